// User profile linking. Users reference the shared insight for their selected
// industry; authentication happens upstream and the user id arrives in the path.

pub mod handlers;
pub mod profile;
pub mod store;
