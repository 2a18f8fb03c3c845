use serde::Deserialize;

/// Daemon configuration, loaded from a TOML file. Every field has a default
/// so a missing file or a partial one works.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Physical pixel count, at most one DMX universe worth.
    pub num_leds: usize,
    /// Initial master brightness, 0..=1. Also what the `power on` command
    /// restores.
    pub brightness: f32,
    /// OLA daemon address receiving the DMX frames.
    pub ola_addr: String,
    /// Show started at boot.
    pub default_show: String,
    /// MQTT remote control; absent means MQTT stays off.
    pub mqtt: Option<MqttConfig>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            num_leds: 160,
            brightness: 0.1,
            ola_addr: "127.0.0.1:7770".to_string(),
            default_show: "rainbow".to_string(),
            mqtt: None,
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    /// Topic prefix: commands arrive on `{prefix}/led/command/+`, status
    /// goes out on `{prefix}/led/status/state`.
    pub prefix: String,
    /// Empty means broker-assigned.
    pub client_id: String,
    pub status_interval_secs: u64,
}

impl Default for MqttConfig {
    fn default() -> MqttConfig {
        MqttConfig {
            host: "localhost".to_string(),
            port: 1883,
            prefix: "sensors".to_string(),
            client_id: String::new(),
            status_interval_secs: 30,
        }
    }
}

impl MqttConfig {
    pub fn url(&self) -> String {
        format!("tcp://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml_from_str("num_leds = 42\n");
        assert_eq!(config.num_leds, 42);
        assert_eq!(config.brightness, 0.1);
        assert_eq!(config.default_show, "rainbow");
        assert!(config.mqtt.is_none());
    }

    #[test]
    fn mqtt_section_enables_the_remote() {
        let config: Config = toml_from_str("[mqtt]\nhost = \"broker.local\"\n");
        let mqtt = config.mqtt.unwrap();
        assert_eq!(mqtt.url(), "tcp://broker.local:1883");
        assert_eq!(mqtt.prefix, "sensors");
        assert_eq!(mqtt.status_interval_secs, 30);
    }

    fn toml_from_str(text: &str) -> Config {
        use config_file::FromConfigFile;
        use std::sync::atomic::{AtomicUsize, Ordering};

        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let mut path = std::env::temp_dir();
        path.push(format!(
            "lichtband-config-test-{}-{}.toml",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&path, text).unwrap();

        let config = Config::from_config_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        config
    }
}
