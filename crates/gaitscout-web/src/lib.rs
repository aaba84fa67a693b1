//! gaitscout-web — REST API over the candidate queue, library, and
//! feedback log.

pub mod handlers;
pub mod ratelimit;
pub mod router;
pub mod state;
