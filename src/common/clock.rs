// src/common/clock.rs

use chrono::{Local, NaiveDateTime};

/// Fonte do "agora" local usado nos carimbos exibidos ao usuário.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub struct FixedClock(pub NaiveDateTime);

#[cfg(test)]
impl FixedClock {
    pub fn at(stamp: &str) -> Self {
        Self(NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M").unwrap())
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
