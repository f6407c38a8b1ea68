//! UIコンポーネントモジュール

pub mod collection_panel;
pub mod log_footer;
pub mod status_card;

pub use collection_panel::CollectionPanel;
pub use log_footer::LogFooter;
pub use status_card::StatusCard;
