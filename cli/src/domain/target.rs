//! Test targets given on the command line.
//!
//! Syntax: `<instance-id>=<host>[:<port>]` or `<host>[:<port>]`. IPv6 hosts
//! with a port use brackets: `i-0abc12345=[2001:db8::7]:2222`.

use core::net::Ipv6Addr;
use std::str::FromStr;

use bootstrap_common::{InstanceInfo, validate_instance_id};

use crate::domain::error::TargetError;

/// One instance to run the test command on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Instance reference carried into the result; `address` is the SSH host.
    pub instance: InstanceInfo,
    /// Explicit port, or `None` to use the configured default.
    pub port: Option<u16>,
}

impl Target {
    #[must_use]
    pub fn host(&self) -> &str {
        &self.instance.address
    }

    #[must_use]
    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target = s.trim();
        if target.is_empty() {
            return Err(TargetError::Empty);
        }

        let (id, rest) = match target.split_once('=') {
            Some((id, rest)) => (Some(id.trim()), rest.trim()),
            None => (None, target),
        };
        let (host, port) = split_host_port(target, rest)?;
        if host.is_empty() {
            return Err(TargetError::MissingHost(target.to_string()));
        }

        let id = id.filter(|id| !id.is_empty()).unwrap_or(host);
        validate_instance_id(id).map_err(|reason| TargetError::InvalidInstanceId {
            id: id.to_string(),
            reason,
        })?;

        Ok(Self {
            instance: InstanceInfo::new(id, host),
            port,
        })
    }
}

fn split_host_port<'a>(
    target: &str,
    rest: &'a str,
) -> Result<(&'a str, Option<u16>), TargetError> {
    if let Some(inner) = rest.strip_prefix('[') {
        let Some((host, after)) = inner.split_once(']') else {
            return Err(TargetError::MissingHost(target.to_string()));
        };
        return match after.strip_prefix(':') {
            Some(port) => Ok((host, Some(parse_port(target, port)?))),
            None if after.is_empty() => Ok((host, None)),
            None => Err(TargetError::InvalidPort {
                target: target.to_string(),
                port: after.to_string(),
            }),
        };
    }

    match rest.rsplit_once(':') {
        None => Ok((rest, None)),
        Some((host, port)) if !host.contains(':') => Ok((host, Some(parse_port(target, port)?))),
        // Bare IPv6 address without a port.
        Some(_) if rest.parse::<Ipv6Addr>().is_ok() => Ok((rest, None)),
        Some((_, port)) => Err(TargetError::InvalidPort {
            target: target.to_string(),
            port: port.to_string(),
        }),
    }
}

fn parse_port(target: &str, port: &str) -> Result<u16, TargetError> {
    port.parse::<u16>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| TargetError::InvalidPort {
            target: target.to_string(),
            port: port.to_string(),
        })
}
