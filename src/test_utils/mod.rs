#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, seed_category};
pub(crate) use http::{
    TEST_SECRET, assert_message, assert_status, get_test_app_state, make_token, parse_json_body,
};

/// The UTC timezone, for tests that do not care about local time.
pub(crate) fn utc() -> &'static time_tz::Tz {
    crate::timezone::resolve_timezone("Etc/UTC").expect("Etc/UTC is a known timezone")
}
