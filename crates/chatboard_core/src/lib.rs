pub mod chat_view;
pub mod domain;
pub mod memory;
pub mod message_store;
pub mod ports;
pub mod profile;
pub mod session_gate;
pub mod user_store;
pub mod validation;

pub use domain::{ChatMessage, Gender, RecordId, RegistrationForm, UserRecord};
pub use memory::{ManualClock, MemoryStorage};
pub use message_store::{MessageError, MessageStore};
pub use ports::{Clock, KeyValueStorage, PortError, PortResult, SystemClock};
pub use profile::ProfileView;
pub use session_gate::{Access, SessionGate, View};
pub use user_store::{LoginError, RegisterError, UserStore};
pub use validation::{Field, FieldError, ValidationErrors};
