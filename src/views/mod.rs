//! View controllers.

pub mod menu_view;
pub mod video_browser;
pub mod video_view;

pub use menu_view::MenuViewController;
pub use video_browser::{BrowserViewState, VIDEO_BROWSER_VIEW_NAME, VideoBrowserController};
pub use video_view::{VIDEO_VIEW_NAME, VideoViewController};
