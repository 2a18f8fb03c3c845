use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use json::JsonValue;
use mqtt::{Message, Receiver};
use paho_mqtt as mqtt;

use crate::config::MqttConfig;
use crate::control::Control;
use crate::layout::Layout;
use crate::olaoutput::StripHandle;
use crate::shows;
use crate::strip::Strip;

/// How long one drain cycle waits for a message. Bounds the remote-control
/// latency and leaves room for the periodic status publish; one message per
/// cycle keeps bursts from hogging the thread.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

pub struct MqttControl {
    client: mqtt::Client,
    receiver: Receiver<Option<Message>>,
    topics: Topics,
    control: Arc<Mutex<Control>>,
    strip: StripHandle,
    default_brightness: f32,
    status_interval: Duration,
    start_time: Instant,
}

struct Topics {
    command_base: String,
    status: String,
}

/// Decoded `show` command payload.
struct ShowCommand {
    name: String,
    args: JsonValue,
    kwargs: JsonValue,
    layout: Option<LayoutSpec>,
}

struct LayoutSpec {
    dead: i32,
    mirror: bool,
    reverse: bool,
}

impl MqttControl {
    fn make_lwt_message(topic: &str) -> mqtt::Message {
        let payload = json::object! {
            available: "offline"
        };

        mqtt::Message::new_retained(topic, json::stringify(payload), 0)
    }

    pub fn new(
        config: &MqttConfig,
        control: Arc<Mutex<Control>>,
        strip: StripHandle,
        default_brightness: f32,
    ) -> Result<MqttControl, String> {
        let topics = Topics {
            command_base: format!("{}/led/command/#", config.prefix),
            status: format!("{}/led/status/state", config.prefix),
        };

        let create_opts = mqtt::CreateOptionsBuilder::new()
            .server_uri(config.url())
            .client_id(config.client_id.clone())
            .finalize();
        let client = match mqtt::Client::new(create_opts) {
            Ok(client) => client,
            Err(err) => {
                return Err(format!("{:?}", err));
            }
        };

        let conn_opts = mqtt::ConnectOptionsBuilder::new()
            .keep_alive_interval(Duration::from_secs(20))
            .clean_session(true)
            .will_message(MqttControl::make_lwt_message(&topics.status))
            .finalize();

        if let Err(err) = client.connect(conn_opts) {
            return Err(format!("Cannot connect to {}: {:?}", config.url(), err));
        }

        log::info!("Connected to broker at {}", config.url());

        let receiver = client.start_consuming();
        if let Err(err) = client.subscribe(&topics.command_base, 0) {
            return Err(format!(
                "Failed to subscribe to topic {}: {:?}",
                &topics.command_base, err
            ));
        };

        let mqtt_control = MqttControl {
            client,
            receiver,
            topics,
            control,
            strip,
            default_brightness,
            status_interval: Duration::from_secs(config.status_interval_secs),
            start_time: Instant::now(),
        };

        mqtt_control.publish_status();
        Ok(mqtt_control)
    }

    pub fn run(&self) {
        let mut last_status = Instant::now();

        loop {
            match self.receiver.recv_timeout(DRAIN_TIMEOUT) {
                Ok(Some(msg)) => self.handle_message(&msg),
                Ok(None) => {
                    log::warn!("Lost connection to the broker");
                    if let Err(err) = self.client.reconnect() {
                        log::warn!("Reconnection failed: {err}");
                    }
                }
                // Timeout, nothing queued
                Err(_) => {}
            };

            if last_status.elapsed() >= self.status_interval {
                self.publish_status();
                last_status = Instant::now();
            }
        }
    }

    fn handle_message(&self, msg: &Message) {
        let topic = msg.topic().to_string();
        let parts: Vec<&str> = topic.split('/').collect();
        if parts.len() < 2 || parts[parts.len() - 2] != "command" {
            log::warn!("Unexpected topic: {}", topic);
            return;
        }

        let payload = msg.payload_str();
        log::info!("Received {}: {}", topic, payload);

        match parts[parts.len() - 1] {
            "show" => self.handle_show(&payload),
            "brightness" => self.handle_brightness(&payload),
            "power" => self.handle_power(&payload),
            command => log::warn!("Unknown command: {}", command),
        }
    }

    fn handle_show(&self, payload: &str) {
        let command = match parse_show_command(payload) {
            Ok(command) => command,
            Err(err) => {
                log::warn!("Ignoring show command: {}", err);
                return;
            }
        };

        let base: Box<dyn Strip> = Box::new(self.strip.clone());
        let target = match &command.layout {
            Some(spec) => {
                log::info!(
                    "Using layout: dead={}, mirror={}, reverse={}",
                    spec.dead,
                    spec.mirror,
                    spec.reverse
                );
                match Layout::new(base, spec.dead, spec.mirror, spec.reverse) {
                    Ok(layout) => Box::new(layout) as Box<dyn Strip>,
                    Err(err) => {
                        log::warn!("Invalid layout: {}", err);
                        return;
                    }
                }
            }
            None => base,
        };

        match shows::create(&command.name, target, &command.args, &command.kwargs) {
            Ok(show) => {
                self.control.lock().unwrap().set_show(&command.name, show);
                log::info!("Switched to show: {}", command.name);
                self.publish_status();
            }
            Err(err) => log::warn!("Failed to create show {}: {}", command.name, err),
        }
    }

    fn handle_brightness(&self, payload: &str) {
        match parse_brightness(payload) {
            Ok(brightness) => {
                self.strip.set_brightness(brightness);
                log::info!("Brightness set to: {}", brightness);
                self.publish_status();
            }
            Err(err) => log::warn!("{}", err),
        }
    }

    fn handle_power(&self, payload: &str) {
        match parse_power(payload) {
            Ok(true) => {
                self.strip.set_brightness(self.default_brightness);
                log::info!("LEDs powered on");
                self.publish_status();
            }
            Ok(false) => {
                self.strip.set_brightness(0.0);
                log::info!("LEDs powered off");
                self.publish_status();
            }
            Err(err) => log::warn!("{}", err),
        }
    }

    fn publish_status(&self) {
        if !self.client.is_connected() {
            if let Err(err) = self.client.reconnect() {
                log::warn!("Reconnection failed: {err}");
                return;
            }
        }

        let brightness = self.strip.brightness();
        let show = self
            .control
            .lock()
            .unwrap()
            .current_show_name()
            .unwrap_or("none")
            .to_string();
        let power = if brightness > 0.0 { "on" } else { "off" };
        let uptime = self.start_time.elapsed().as_secs();
        let payload = json::object! {
            show: show,
            brightness: brightness,
            power: power,
            uptime: uptime,
        };

        let payload_str = json::stringify(payload);
        let msg = mqtt::Message::new_retained(&self.topics.status, payload_str.clone(), 0);
        log::info!("Publishing {}: {}", self.topics.status, &payload_str);
        if let Err(err) = self.client.publish(msg) {
            log::warn!("Publishing failed: {err}");
        }
    }
}

impl Drop for MqttControl {
    fn drop(&mut self) {
        if let Err(err) = self.client.disconnect(None) {
            // We don't really care about errors here, but let's make rustc happy.
            log::error!("{:?}", err);
        }
    }
}

fn parse_show_command(payload: &str) -> Result<ShowCommand, String> {
    let message = match json::parse(payload) {
        Ok(message) => message,
        Err(err) => return Err(format!("Invalid JSON: {}", err)),
    };

    let name = match message["show"].as_str() {
        Some(name) => name.to_string(),
        None => return Err("No show specified".to_string()),
    };

    let args = if message.has_key("args") {
        if !message["args"].is_array() {
            return Err(format!("args must be a list, got {}", message["args"]));
        }
        message["args"].clone()
    } else {
        JsonValue::new_array()
    };

    let kwargs = if message.has_key("kwargs") {
        if !message["kwargs"].is_object() {
            return Err(format!(
                "kwargs must be an object, got {}",
                message["kwargs"]
            ));
        }
        message["kwargs"].clone()
    } else {
        JsonValue::new_object()
    };

    let layout = if message.has_key("layout") {
        let spec = &message["layout"];
        if !spec.is_object() {
            return Err(format!("layout must be an object, got {}", spec));
        }
        Some(LayoutSpec {
            dead: spec["dead"].as_i32().unwrap_or(0),
            mirror: spec["mirror"].as_bool().unwrap_or(false),
            reverse: spec["reverse"].as_bool().unwrap_or(false),
        })
    } else {
        None
    };

    Ok(ShowCommand {
        name,
        args,
        kwargs,
        layout,
    })
}

/// Accepts bare numeric text or `{"brightness": x}`; out-of-range values
/// are clamped, not rejected.
fn parse_brightness(payload: &str) -> Result<f32, String> {
    let value = match json::parse(payload) {
        Ok(message) if message.is_object() => message["brightness"].as_f32(),
        Ok(message) => message.as_f32(),
        Err(_) => payload.trim().parse::<f32>().ok(),
    };

    match value {
        Some(brightness) => Ok(brightness.clamp(0.0, 1.0)),
        None => Err(format!("Invalid brightness value: {}", payload)),
    }
}

/// Accepts `"on"`/`"off"` as bare text or `{"power": ...}`. Returns whether
/// power should be on.
fn parse_power(payload: &str) -> Result<bool, String> {
    let text = match json::parse(payload) {
        Ok(message) if message.is_object() => match message["power"].as_str() {
            Some(value) => value.to_string(),
            None => return Err(format!("No power value in: {}", payload)),
        },
        Ok(message) => match message.as_str() {
            Some(value) => value.to_string(),
            None => return Err(format!("Invalid power command: {}", payload)),
        },
        Err(_) => payload.trim().to_lowercase(),
    };

    match text.trim().to_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(format!("Invalid power command: {}", other)),
    }
}
