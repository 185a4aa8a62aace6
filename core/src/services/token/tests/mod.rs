//! Tests for the token service


use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::repositories::MockTokenRepository;
use crate::services::token::{Clock, ManualClock, TokenService, TokenServiceConfig};

pub(super) const ACCESS_TTL_SECS: i64 = 15 * 60;
pub(super) const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new(
        "access-secret-for-tests",
        Duration::seconds(ACCESS_TTL_SECS),
        "refresh-secret-for-tests",
        Duration::seconds(REFRESH_TTL_SECS),
    )
}

pub(super) struct Fixture {
    pub service: TokenService<MockTokenRepository>,
    pub repo: MockTokenRepository,
    pub clock: ManualClock,
}

impl Fixture {
    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

pub(super) fn fixture() -> Fixture {
    let repo = MockTokenRepository::new();
    let clock = ManualClock::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap());
    let service = TokenService::with_clock(repo.clone(), test_config(), Arc::new(clock.clone()));

    Fixture {
        service,
        repo,
        clock,
    }
}
