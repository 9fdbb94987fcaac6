pub mod errors;
pub mod html;
pub mod media;
pub mod redirect;

pub use crate::errors::ResultResp;
pub use errors::error_response;
pub use html::{html_response, html_status};
pub use media::{css_response, media_response};
pub use redirect::{redirect, redirect_with_cookie};
