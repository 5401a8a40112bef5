//! Cookie helpers
//!
//! Values are percent-encoded on write and decoded on read, names are
//! validated and stored verbatim. Reading a value written by something else
//! that is not valid percent-encoding returns it untouched.

use crate::config::CookieConfig;
use crate::error::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Backing store with `document.cookie` semantics
pub trait CookieJar {
    /// All visible cookies as `a=1; b=2`
    fn read(&self) -> String;

    /// Apply a single `name=value; attr=...` assignment
    fn write(&self, assignment: &str);
}

/// Typed access to a cookie jar
#[derive(Debug, Clone)]
pub struct Cookies<J> {
    jar: J,
    config: CookieConfig,
}

impl<J: CookieJar> Cookies<J> {
    pub fn new(jar: J, config: CookieConfig) -> Self {
        Self { jar, config }
    }

    /// Store `value` under `name` for the configured number of days
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        let expires = TimeDelta::try_days(self.config.expiry_days)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                Error::config(format!(
                    "cookie expiry of {} days is out of range",
                    self.config.expiry_days
                ))
            })?;
        self.set_until(name, value, expires)
    }

    pub fn set_until(&self, name: &str, value: &str, expires: DateTime<Utc>) -> Result<()> {
        validate_name(name)?;
        self.jar
            .write(&assignment(name, &urlencoding::encode(value), expires, &self.config.path));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        lookup(&self.jar.read(), name)
    }

    /// Remove `name` by expiring it immediately
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.jar
            .write(&assignment(name, "", DateTime::<Utc>::UNIX_EPOCH, &self.config.path));
        Ok(())
    }

    pub fn jar(&self) -> &J {
        &self.jar
    }
}

fn assignment(name: &str, encoded: &str, expires: DateTime<Utc>, path: &str) -> String {
    format!(
        "{name}={encoded}; expires={}; path={path}",
        expires.format(EXPIRES_FORMAT)
    )
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '=' | ';' | ','));
    if invalid {
        return Err(Error::InvalidCookieName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Find `name` in a `document.cookie` style string and decode its value
pub fn lookup(raw: &str, name: &str) -> Option<String> {
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned())
        })
}

/// In-process jar honouring `expires`, for hosts without a browser
#[derive(Debug, Default)]
pub struct MemoryJar {
    cookies: RefCell<BTreeMap<String, String>>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieJar for MemoryJar {
    fn read(&self) -> String {
        self.cookies
            .borrow()
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, assignment: &str) {
        let mut parts = assignment.split(';').map(str::trim);
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let expired = parts
            .filter_map(|attr| attr.split_once('='))
            .filter(|(key, _)| key.eq_ignore_ascii_case("expires"))
            .filter_map(|(_, date)| DateTime::parse_from_rfc2822(date).ok())
            .any(|date| date <= Utc::now());

        let mut cookies = self.cookies.borrow_mut();
        if expired {
            cookies.remove(name);
        } else {
            cookies.insert(name.to_string(), value.to_string());
        }
    }
}

impl<T: CookieJar + ?Sized> CookieJar for std::rc::Rc<T> {
    fn read(&self) -> String {
        (**self).read()
    }

    fn write(&self, assignment: &str) {
        (**self).write(assignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn cookies() -> Cookies<Rc<MemoryJar>> {
        Cookies::new(Rc::new(MemoryJar::new()), CookieConfig::default())
    }

    #[test]
    fn set_then_get_round_trips() {
        let cookies = cookies();
        cookies.set("username", "v").unwrap();
        assert_eq!(cookies.get("username").as_deref(), Some("v"));
    }

    #[test]
    fn out_of_range_expiry_is_an_error() {
        let cookies = Cookies::new(
            MemoryJar::new(),
            CookieConfig {
                expiry_days: 1_000_000_000,
                ..CookieConfig::default()
            },
        );
        assert!(matches!(
            cookies.set("username", "v"),
            Err(Error::Config { .. })
        ));
        assert_eq!(cookies.get("username"), None);
    }

    #[test]
    fn delete_then_get_is_none() {
        let cookies = cookies();
        cookies.set("username", "v").unwrap();
        cookies.delete("username").unwrap();
        assert_eq!(cookies.get("username"), None);
    }

    #[test]
    fn values_are_percent_encoded_in_the_jar() {
        let cookies = cookies();
        cookies.set("note", "a b;c=d/é").unwrap();
        assert_eq!(cookies.jar().read(), "note=a%20b%3Bc%3Dd%2F%C3%A9");
        assert_eq!(cookies.get("note").as_deref(), Some("a b;c=d/é"));
    }

    #[test]
    fn assignment_carries_expiry_and_path() {
        let expires = DateTime::parse_from_rfc3339("2026-11-15T08:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            assignment("username", "root", expires, "/"),
            "username=root; expires=Sun, 15 Nov 2026 08:30:00 GMT; path=/"
        );
    }

    #[test]
    fn lookup_matches_whole_names_only() {
        let raw = "XSRF-TOKEN=abc; authed=\"yes|1700000000|sig\"; xsrf=zzz";
        assert_eq!(lookup(raw, "XSRF-TOKEN").as_deref(), Some("abc"));
        assert_eq!(lookup(raw, "xsrf").as_deref(), Some("zzz"));
        assert_eq!(lookup(raw, "TOKEN"), None);
    }

    #[test]
    fn undecodable_value_is_returned_raw() {
        assert_eq!(lookup("k=%ZZ", "k").as_deref(), Some("%ZZ"));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let cookies = cookies();
        for name in ["", "a b", "a=b", "a;b"] {
            assert!(matches!(
                cookies.set(name, "v"),
                Err(Error::InvalidCookieName { .. })
            ));
        }
    }
}
