pub(crate) mod blend;
pub(crate) mod color;
pub(crate) mod config;
pub(crate) mod control;
pub(crate) mod layout;
pub(crate) mod mqtt;
pub(crate) mod olaoutput;
pub(crate) mod scheduler;
pub(crate) mod shows;
pub(crate) mod strip;
pub(crate) mod touch;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use clap::Parser;
use config_file::FromConfigFile;

use crate::config::Config;
use crate::control::Control;
use crate::mqtt::MqttControl;
use crate::olaoutput::{OlaStrip, StripHandle};
use crate::scheduler::Scheduler;

#[derive(Parser)]
struct Cli {
    /// The TOML configuration file to load
    #[arg(short, long, value_name = "FILE")]
    config: Option<std::path::PathBuf>,

    /// Show to start with instead of the configured default
    #[arg(short, long, value_name = "NAME")]
    show: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Cli::parse();

    let config = match args.config.as_deref() {
        Some(path) => match Config::from_config_file(path) {
            Ok(config) => config,
            Err(err) => panic!("Cannot read configuration: {}", err),
        },
        None => Config::default(),
    };

    let ola_addr = match SocketAddr::from_str(&config.ola_addr) {
        Ok(addr) => addr,
        Err(err) => panic!("Invalid OLA address {}: {}", config.ola_addr, err),
    };
    let strip = match OlaStrip::new(config.num_leds, config.brightness, ola_addr) {
        Ok(strip) => StripHandle::new(strip),
        Err(msg) => panic!("Cannot set up OLA output: {}", msg),
    };

    let control = Arc::new(Mutex::new(Control::new(Box::new(strip.clone()))));

    let show_name = args.show.unwrap_or_else(|| config.default_show.clone());
    match shows::create(
        &show_name,
        Box::new(strip.clone()),
        &json::JsonValue::new_array(),
        &json::JsonValue::new_object(),
    ) {
        Ok(show) => control.lock().unwrap().set_show(&show_name, show),
        Err(err) => log::warn!("Cannot start show {}: {}", show_name, err),
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        if let Err(err) = ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed)) {
            panic!("Cannot install the shutdown handler: {}", err);
        }
    }

    if let Some(mqtt_config) = config.mqtt.clone() {
        let mqtt_control = match MqttControl::new(
            &mqtt_config,
            Arc::clone(&control),
            strip.clone(),
            config.brightness,
        ) {
            Ok(mqtt_control) => mqtt_control,
            Err(msg) => panic!("Cannot set up MQTT: {}", msg),
        };

        let res = thread::Builder::new()
            .name("MQTT".to_string())
            .spawn(move || {
                mqtt_control.run();
            });
        if let Err(error) = res {
            panic!("Failed to create thread: {}", error);
        }
    } else {
        log::info!("MQTT disabled - no [mqtt] section configured");
    }

    let mut scheduler = Scheduler::new(
        Arc::clone(&control),
        Box::new(strip.clone()),
        Arc::clone(&shutdown),
    );
    scheduler.run();

    strip.blackout();
}
