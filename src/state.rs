use std::sync::Arc;

use crate::config::Config;
use crate::dead_letter::DeadLetter;
use crate::ping::Pinger;
use crate::sheets::SheetsAccess;
use crate::worker::Dispatcher;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub pinger: Pinger,
    pub sheets: SheetsAccess,
    pub dispatcher: Dispatcher,
    pub dead_letter: Arc<DeadLetter>,
}
