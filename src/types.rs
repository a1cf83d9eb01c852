// src/types.rs
use serde::{Deserialize, Serialize};
use crate::drivers::StreamMessage;

// Where columns come from
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMode {
    #[default]
    Live,
    Simulation,
}

impl ConnectionMode {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionMode::Live => "LIVE",
            ConnectionMode::Simulation => "SIM",
        }
    }
}

// GUI -> engine
#[derive(Clone, Debug)]
pub enum GuiCommand {
    Connect { mode: ConnectionMode, url: String },
    Disconnect,
}

// engine -> GUI
#[derive(Clone, Debug)]
pub enum EngineMessage {
    Log(String),
    Status(bool), // connected
    Column(StreamMessage),
}
