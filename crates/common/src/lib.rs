//! Shared plumbing for the sync workspace: logging setup, startup checks,
//! the admin HTTP listener and a few response types used across crates.

pub mod env;
pub mod admin_http;

pub mod utils {
    pub mod logging;
}

pub mod types {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug)]
    pub struct Health {
        pub status: String,
    }

    impl Health {
        pub fn ok() -> Self {
            Self { status: "ok".to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::types::Health;

    #[test]
    fn health_type_ok() {
        let h = Health::ok();
        assert_eq!(h.status, "ok");
    }
}
