//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: model name, status, pending requests
//! - `EntryBlock`: one question/answer pair
//! - `LandingPage`: empty-history placeholder
//! - `ConfirmClear`, `Alert`: modal overlays
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it each frame:
//! - `InputBox`: single-line draft
//! - `ConversationState` / `Conversation`: scrollable history view
//! - `SidebarState` / `Sidebar`: newest-first history index
//!
//! Components receive external data as props rather than reaching into
//! `App`, so each can be rendered against a `TestBackend` in isolation.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── sidebar.rs
//! ├── conversation.rs  (scroll + layout cache)
//! ├── entry.rs         (single entry renderer)
//! ├── input_box.rs
//! ├── landing.rs
//! └── dialog.rs        (confirm clear, alert)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod conversation;
pub mod dialog;
pub mod entry;
pub mod input_box;
pub mod landing;
pub mod sidebar;

pub use conversation::{Conversation, ConversationState};
pub use dialog::{Alert, ConfirmClear};
pub use input_box::{InputBox, InputEvent};
pub use landing::LandingPage;
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
