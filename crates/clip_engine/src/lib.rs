//! Clipharvest engine: browser driving, network capture, and resolution pipeline.
mod chromium;
mod driver;
mod guard;
mod harvester;
mod resolver;
mod settings;

pub use chromium::{find_chrome_executable, ChromiumDriver};
pub use driver::{CapturedResponse, DriverError, ElementHandle, PageDriver};
pub use guard::DriverSession;
pub use harvester::{FeedHarvester, HarvestError};
pub use resolver::{LinkResolver, ResolveError};
pub use settings::{BrowserSettings, EngineSettings};
