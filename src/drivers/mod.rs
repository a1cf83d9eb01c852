// src/drivers/mod.rs
// Rendering core: no UI types below this point.
pub mod axis;
pub mod colormap;
pub mod config;
pub mod error;
pub mod gain;
pub mod mapping;
pub mod plot;
pub mod scroll;
pub mod session;
pub mod source;
pub mod stats;
pub mod zoom;
pub use colormap::{Colormap, Palette};
pub use config::DisplayConfig;
pub use error::SpectrogramError;
pub use plot::{render_waterfall_png, PlotStyle};
pub use session::SpectrogramSession;
pub use source::{ColumnSource, SimulatedSource, StreamMessage, WebSocketSource};
