//! Inventory sources for already-used address ranges
//!
//! Sources hand the planner a parsed list of IPv4 ranges. Parsing is
//! lenient: the inventory reflects what users typed into other tools, so
//! unusable entries are skipped instead of failing the whole plan.

use std::io;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use ipnet::{IpNet, Ipv4Net};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::Ipv4Range;
use crate::infrastructure::traits::{CommandRunner, FileSystem, RangeInventory};
use crate::infrastructure::{InfraError, InfraResult};

/// JMESPath query selecting every VNet address prefix in a subscription.
pub const AZ_VNET_PREFIX_QUERY: &str = "[].addressSpace.addressPrefixes[]";

const AZ_MISSING_HINT: &str =
    "Azure CLI 'az' was not found in PATH; install it and restart your terminal";

/// `cmd /C` reports an unknown program on stderr instead of failing to spawn.
const CMD_NOT_RECOGNIZED: &str = "is not recognized as an internal or external command";

/// VNet address spaces of an Azure subscription, read through the `az` CLI.
pub struct AzureCliInventory {
    cmd: Arc<dyn CommandRunner>,
    subscription: Option<String>,
}

impl AzureCliInventory {
    /// Query the default subscription, or `subscription` if given.
    pub fn new(cmd: Arc<dyn CommandRunner>, subscription: Option<String>) -> Self {
        Self { cmd, subscription }
    }

    fn args(&self) -> Vec<&str> {
        let mut args = vec!["network", "vnet", "list", "--query", AZ_VNET_PREFIX_QUERY];
        if let Some(subscription) = &self.subscription {
            args.extend(["--subscription", subscription.as_str()]);
        }
        args.extend(["-o", "json"]);
        args
    }
}

impl RangeInventory for AzureCliInventory {
    #[instrument(level = "debug", skip(self))]
    fn used_ranges(&self) -> InfraResult<Vec<Ipv4Range>> {
        let args = self.args();
        debug!("az {}", args.join(" "));

        let output = self.cmd.run("az", &args).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => InfraError::AzureCli {
                message: AZ_MISSING_HINT.into(),
                exit_code: None,
            },
            _ => InfraError::io("run az", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let exit_code = output.status.code();
            let message = if stderr.contains(CMD_NOT_RECOGNIZED) {
                AZ_MISSING_HINT.to_string()
            } else if !stderr.is_empty() {
                stderr
            } else if !stdout.is_empty() {
                stdout
            } else {
                match exit_code {
                    Some(code) => format!("az exited with code {code}"),
                    None => "az was terminated by a signal".to_string(),
                }
            };
            return Err(InfraError::AzureCli { message, exit_code });
        }

        parse_cidr_list(&String::from_utf8_lossy(&output.stdout), &self.describe())
    }

    fn describe(&self) -> String {
        match &self.subscription {
            Some(subscription) => format!("az subscription '{subscription}'"),
            None => "az default subscription".to_string(),
        }
    }
}

/// A JSON file holding an array of CIDR strings.
pub struct JsonFileInventory {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonFileInventory {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl RangeInventory for JsonFileInventory {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn used_ranges(&self) -> InfraResult<Vec<Ipv4Range>> {
        let content = self.fs.read_to_string(&self.path).map_err(|e| {
            InfraError::io(format!("read inventory file {}", self.path.display()), e)
        })?;
        parse_cidr_list(&content, &self.describe())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// A fixed list of ranges.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory(pub Vec<Ipv4Range>);

impl RangeInventory for StaticInventory {
    fn used_ranges(&self) -> InfraResult<Vec<Ipv4Range>> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        format!("{} static ranges", self.0.len())
    }
}

/// Parse a JSON array of CIDR strings into IPv4 ranges.
///
/// - blank input and non-array JSON yield an empty list
/// - null, empty, unparsable and IPv6 entries are skipped
/// - bare addresses are read as host routes (`/32`)
/// - host bits are dropped (`10.1.2.3/16` becomes `10.1.0.0/16`)
pub fn parse_cidr_list(json: &str, source_name: &str) -> InfraResult<Vec<Ipv4Range>> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(json).map_err(|e| InfraError::InvalidInventory {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;

    let Value::Array(items) = value else {
        debug!("{source_name}: expected a JSON array, ignoring");
        return Ok(Vec::new());
    };

    let mut ranges = Vec::with_capacity(items.len());
    for item in items {
        let text = match item {
            Value::Null | Value::Bool(false) => continue,
            Value::String(s) => s,
            other => other.to_string(),
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match parse_network(text) {
            Some(IpNet::V4(net)) => ranges.push(Ipv4Range::truncating(net)),
            Some(IpNet::V6(net)) => debug!("{source_name}: skipping IPv6 range {net}"),
            None => warn!("{source_name}: skipping unparsable range '{text}'"),
        }
    }
    debug!("{source_name}: {} used ranges", ranges.len());
    Ok(ranges)
}

fn parse_network(text: &str) -> Option<IpNet> {
    if let Ok(net) = text.parse::<IpNet>() {
        return Some(net);
    }
    match text.parse::<IpAddr>().ok()? {
        IpAddr::V4(addr) => Some(IpNet::V4(Ipv4Net::from(addr))),
        IpAddr::V6(addr) => Some(IpNet::V6(addr.into())),
    }
}
