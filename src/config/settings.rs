use serde::Deserialize;

use crate::broker::mailbox::DEFAULT_CAPACITY;

/// Top-level configuration settings for the application.
///
/// Includes settings for the broker, the router and logging.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub router: RouterSettings,
    pub logging: LoggingSettings,
}

/// Configuration settings for the broker.
///
/// `mailbox_capacity` bounds every subscription's mailbox; deliveries beyond it are dropped.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    pub mailbox_capacity: usize,
}

/// Configuration settings for the router.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouterSettings {
    pub queue_capacity: usize,
    pub unknown_queue_name: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSettings {
    pub broker: Option<PartialBrokerSettings>,
    pub router: Option<PartialRouterSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialBrokerSettings {
    pub mailbox_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialRouterSettings {
    pub queue_capacity: Option<usize>,
    pub unknown_queue_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl PartialSettings {
    /// Fill every missing value from `default`.
    pub fn merge(self, default: Settings) -> Settings {
        let broker = self.broker.unwrap_or_default();
        let router = self.router.unwrap_or_default();
        let logging = self.logging.unwrap_or_default();

        Settings {
            broker: BrokerSettings {
                mailbox_capacity: broker
                    .mailbox_capacity
                    .unwrap_or(default.broker.mailbox_capacity),
            },
            router: RouterSettings {
                queue_capacity: router
                    .queue_capacity
                    .unwrap_or(default.router.queue_capacity),
                unknown_queue_name: router
                    .unknown_queue_name
                    .unwrap_or(default.router.unknown_queue_name),
            },
            logging: LoggingSettings {
                level: logging.level.unwrap_or(default.logging.level),
            },
        }
    }
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            broker: BrokerSettings::default(),
            router: RouterSettings::default(),
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            queue_capacity: 10,
            unknown_queue_name: "/unknown".to_string(),
        }
    }
}
