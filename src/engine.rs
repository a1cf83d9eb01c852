// src/engine.rs
use crate::drivers::{ColumnSource, SimulatedSource, WebSocketSource};
use crate::types::*;
use log::{error, info, warn};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

// About ten profiles per second, like the instrument.
const SIMULATION_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Forwarded,
    Idle,
    Closed,
}

pub fn spawn_thread(tx: Sender<EngineMessage>, rx_cmd: Receiver<GuiCommand>, read_timeout: Duration) {
    thread::spawn(move || {
        tx.send(EngineMessage::Log("Engine ready.".to_owned())).ok();
        let mut source: Option<Box<dyn ColumnSource + Send>> = None;

        loop {
            // 1. commands from the GUI
            loop {
                match rx_cmd.try_recv() {
                    Ok(GuiCommand::Connect { mode, url }) => {
                        // close the old stream before opening the next one
                        drop(source.take());
                        source = open_source(mode, &url, read_timeout, &tx);
                    }
                    Ok(GuiCommand::Disconnect) => {
                        if source.take().is_some() {
                            info!("disconnected");
                            tx.send(EngineMessage::Log("Disconnected".to_owned())).ok();
                        }
                        tx.send(EngineMessage::Status(false)).ok();
                    }
                    Err(TryRecvError::Empty) => break,
                    // GUI is gone
                    Err(TryRecvError::Disconnected) => return,
                }
            }

            // 2. stream
            match source.as_mut() {
                Some(active) => match step(active.as_mut(), &tx) {
                    Step::Forwarded => {}
                    Step::Idle => thread::sleep(Duration::from_millis(5)),
                    Step::Closed => {
                        source = None;
                        tx.send(EngineMessage::Status(false)).ok();
                    }
                },
                None => thread::sleep(Duration::from_millis(50)),
            }
        }
    });
}

fn open_source(
    mode: ConnectionMode,
    url: &str,
    read_timeout: Duration,
    tx: &Sender<EngineMessage>,
) -> Option<Box<dyn ColumnSource + Send>> {
    match mode {
        ConnectionMode::Simulation => {
            info!("simulation started");
            tx.send(EngineMessage::Status(true)).ok();
            tx.send(EngineMessage::Log("Sim connected".to_owned())).ok();
            Some(Box::new(SimulatedSource::new(SIMULATION_INTERVAL)))
        }
        ConnectionMode::Live => match WebSocketSource::connect(url, read_timeout) {
            Ok(socket) => {
                tx.send(EngineMessage::Status(true)).ok();
                tx.send(EngineMessage::Log(format!("Connected to {}", socket.url()))).ok();
                Some(Box::new(socket))
            }
            Err(e) => {
                error!("connect to {url} failed: {e}");
                tx.send(EngineMessage::Log(format!("Connect failed: {e}"))).ok();
                tx.send(EngineMessage::Status(false)).ok();
                None
            }
        },
    }
}

// Pull at most one message and forward it. Transport errors close the source
// for good; there is no reconnect.
fn step(source: &mut dyn ColumnSource, tx: &Sender<EngineMessage>) -> Step {
    match source.next_message() {
        Ok(Some(message)) => {
            tx.send(EngineMessage::Column(message)).ok();
            Step::Forwarded
        }
        Ok(None) => Step::Idle,
        Err(e) if e.is_fatal_to_stream() => {
            error!("stream ended: {e}");
            tx.send(EngineMessage::Log(format!("Stream ended: {e}"))).ok();
            Step::Closed
        }
        Err(e) => {
            warn!("dropped message: {e}");
            tx.send(EngineMessage::Log(format!("Dropped message: {e}"))).ok();
            Step::Idle
        }
    }
}
