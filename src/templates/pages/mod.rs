pub mod about;
pub mod contact;
pub mod dashboard;
pub mod detail;
pub mod editor;
pub mod home;
pub mod login;
pub mod search;

pub use about::about_page;
pub use contact::contact_page;
pub use dashboard::{dashboard_page, DashboardRow, DashboardVm};
pub use detail::{detail_page, DetailVm};
pub use editor::editor_page;
pub use home::home_page;
pub use login::login_page;
pub use search::{search_page, SearchVm};
