use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PatchError;

/// A mod variant; names a folder of replacement files under the options dir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModOption {
    /// Proxy through `version.dll`.
    DllVersion,
    /// Proxy through `winhttp.dll`.
    DllWinhttp,
    /// Proxy through `dbghelp.dll`.
    DllDbghelp,
    /// ASI loader plugin.
    PluginAsiLoader,
    /// RED4ext plugin (Cyberpunk 2077).
    PluginRed4ext,
}

impl ModOption {
    /// Returns all options in menu order.
    pub fn all() -> &'static [ModOption] {
        &[
            ModOption::DllVersion,
            ModOption::DllWinhttp,
            ModOption::DllDbghelp,
            ModOption::PluginAsiLoader,
            ModOption::PluginRed4ext,
        ]
    }

    /// Returns the option's folder name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModOption::DllVersion => "dll_version",
            ModOption::DllWinhttp => "dll_winhttp",
            ModOption::DllDbghelp => "dll_dbghelp",
            ModOption::PluginAsiLoader => "plugin_asi_loader",
            ModOption::PluginRed4ext => "plugin_red4ext",
        }
    }
}

impl fmt::Display for ModOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModOption {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModOption::all()
            .iter()
            .copied()
            .find(|opt| opt.as_str() == s)
            .ok_or_else(|| PatchError::UnknownOption(s.to_string()))
    }
}
