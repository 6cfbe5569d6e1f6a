pub mod auth_view;
pub mod history_view;
pub mod line_view;
pub mod schedule_view;

pub use auth_view::{AuthAction, AuthView};
pub use history_view::HistoryView;
pub use line_view::LineView;
pub use schedule_view::ScheduleView;
