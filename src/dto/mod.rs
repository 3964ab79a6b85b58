mod requests;
mod responses;

pub use requests::ViewQuery;
pub use responses::*;
