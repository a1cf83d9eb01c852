#[cfg(test)]
use std::collections::VecDeque;
use std::net::TcpStream;
use std::time::{Duration, Instant};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};
use crate::drivers::SpectrogramError;
/// One depth profile as pushed by the instrument backend.
///
/// Decoding is lenient: `null`, non-numeric and non-finite samples become
/// `None`, and missing fields fall back to "unknown" instead of failing.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StreamMessage {
    /// Intensities, index 0 = shallowest.
    #[serde(default, deserialize_with = "lenient_samples")]
    pub spectrogram: Vec<Option<f64>>,
    /// Meters.
    #[serde(default, deserialize_with = "lenient_number")]
    pub measured_depth: Option<f64>,
    /// Centimeters per sample.
    #[serde(default, deserialize_with = "lenient_number")]
    pub resolution: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub drive_voltage: Option<f64>,
}
impl StreamMessage {
    /// Sample value for rendering; anything absent or malformed draws as 0.
    pub fn sample(&self, idx: usize) -> f64 {
        self.spectrogram.get(idx).copied().flatten().unwrap_or(0.0)
    }
}
fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}
fn lenient_samples<'de, D>(deserializer: D) -> Result<Vec<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    // Anything but an array is an empty column.
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(values)) => Ok(values.iter().map(finite).collect()),
        _ => Ok(Vec::new()),
    }
}
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(finite))
}
/// Decode one text frame. Bare `NaN`/`Infinity` literals and numbers too large
/// for an `f64` are read as `null`.
pub fn parse_message(text: &str) -> Result<StreamMessage, SpectrogramError> {
    match serde_json::from_str(text) {
        Ok(message) => Ok(message),
        Err(err) => {
            let sanitized = replace_non_finite_literals(text);
            if sanitized == text {
                return Err(err.into());
            }
            Ok(serde_json::from_str(&sanitized)?)
        }
    }
}
fn replace_non_finite_literals(text: &str) -> String {
    const LITERALS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut in_string = false;
    let mut escaped = false;
    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if let Some(lit) = LITERALS.iter().find(|lit| rest.starts_with(**lit)) {
            out.push_str("null");
            rest = &rest[lit.len()..];
            continue;
        } else if ch == '-' || ch.is_ascii_digit() {
            let len = rest
                .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
                .unwrap_or(rest.len());
            let token = &rest[..len];
            match token.parse::<f64>() {
                Ok(v) if !v.is_finite() => out.push_str("null"),
                _ => out.push_str(token),
            }
            rest = &rest[len..];
            continue;
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}
/// Something that yields stream messages on demand.
///
/// `Ok(None)` means nothing is available yet; errors for which
/// [`SpectrogramError::is_fatal_to_stream`] holds end the stream.
pub trait ColumnSource {
    fn next_message(&mut self) -> Result<Option<StreamMessage>, SpectrogramError>;
}
/// In-memory source for tests.
#[cfg(test)]
pub struct ManualSource {
    queue: VecDeque<StreamMessage>,
}
#[cfg(test)]
impl ManualSource {
    pub fn new(messages: impl IntoIterator<Item = StreamMessage>) -> Self {
        Self {
            queue: messages.into_iter().collect(),
        }
    }
}
#[cfg(test)]
impl ColumnSource for ManualSource {
    fn next_message(&mut self) -> Result<Option<StreamMessage>, SpectrogramError> {
        Ok(self.queue.pop_front())
    }
}
/// Client for the instrument's `/ws` endpoint.
pub struct WebSocketSource {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    url: String,
}
impl WebSocketSource {
    /// Connects and sets a read timeout so `next_message` never blocks longer
    /// than `poll_interval`.
    pub fn connect(url: &str, poll_interval: Duration) -> Result<Self, SpectrogramError> {
        let (mut socket, response) = tungstenite::connect(url)?;
        info!("connected to {url} (HTTP {})", response.status());
        if let MaybeTlsStream::Plain(stream) = socket.get_mut() {
            stream
                .set_read_timeout(Some(poll_interval.max(Duration::from_millis(1))))
                .map_err(|e| SpectrogramError::Transport(e.to_string()))?;
        }
        Ok(Self {
            socket,
            url: url.to_owned(),
        })
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}
impl ColumnSource for WebSocketSource {
    fn next_message(&mut self) -> Result<Option<StreamMessage>, SpectrogramError> {
        match self.socket.read() {
            Ok(Message::Text(text)) => parse_message(&text).map(Some),
            Ok(Message::Binary(bytes)) => parse_message(&String::from_utf8_lossy(&bytes)).map(Some),
            Ok(Message::Close(frame)) => {
                debug!("close frame from {}: {frame:?}", self.url);
                Err(SpectrogramError::StreamClosed)
            }
            Ok(_) => Ok(None),
            Err(tungstenite::Error::Io(err))
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
impl Drop for WebSocketSource {
    fn drop(&mut self) {
        if self.socket.can_write() {
            self.socket.close(None).ok();
        }
        // also sends the reply queued after a peer close
        self.socket.flush().ok();
    }
}
/// Sound speed in water times the sampling period, halved, in cm per sample.
pub const SIMULATED_RESOLUTION_CM: f64 = 1480.0 * 13.2e-6 * 100.0 / 2.0;
pub const SIMULATED_SAMPLES: usize = 1800;
/// Synthetic echo profiles: a ringdown near the transducer, a noise floor and a
/// bottom return drifting slowly between roughly 5 and 11 meters.
pub struct SimulatedSource {
    rng: StdRng,
    interval: Duration,
    last_emit: Option<Instant>,
    phase: f64,
}
impl SimulatedSource {
    pub fn new(interval: Duration) -> Self {
        Self::with_rng(StdRng::from_entropy(), interval)
    }
    #[cfg(test)]
    pub fn with_seed(seed: u64, interval: Duration) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), interval)
    }
    fn with_rng(rng: StdRng, interval: Duration) -> Self {
        Self {
            rng,
            interval,
            last_emit: None,
            phase: 0.0,
        }
    }
    fn generate(&mut self) -> StreamMessage {
        self.phase += 0.02;
        let meters_per_row = SIMULATED_RESOLUTION_CM / 100.0;
        let bottom_m = 8.0 + 3.0 * self.phase.sin();
        let bottom_idx = (bottom_m / meters_per_row).round() as usize;
        let spectrogram = (0..SIMULATED_SAMPLES)
            .map(|i| {
                let mut v = self.rng.gen_range(0.0..20.0);
                if i < 40 {
                    v += 220.0 * (1.0 - i as f64 / 40.0);
                }
                let offset = i as f64 - bottom_idx as f64;
                v += 180.0 * (-(offset * offset) / 18.0).exp();
                if offset > 0.0 {
                    v += 40.0 * (-offset / 60.0).exp();
                }
                Some(v)
            })
            .collect();
        StreamMessage {
            spectrogram,
            measured_depth: Some(bottom_idx as f64 * meters_per_row),
            resolution: Some(SIMULATED_RESOLUTION_CM),
            temperature: Some(18.0 + self.rng.gen_range(-0.2..0.2)),
            drive_voltage: Some(12.0 + self.rng.gen_range(-0.1..0.1)),
        }
    }
}
impl ColumnSource for SimulatedSource {
    fn next_message(&mut self) -> Result<Option<StreamMessage>, SpectrogramError> {
        if let Some(last) = self.last_emit {
            if last.elapsed() < self.interval {
                return Ok(None);
            }
        }
        self.last_emit = Some(Instant::now());
        Ok(Some(self.generate()))
    }
}
