//! HDL language tags.

use serde::{Deserialize, Serialize};

use crate::path;

/// Extensions recognized as Verilog.
pub const VERILOG_EXTS: &[&str] = &["v", "vh", "vl"];
/// Extensions recognized as SystemVerilog.
pub const SYSTEM_VERILOG_EXTS: &[&str] = &["sv", "svh"];
/// Extensions recognized as VHDL.
pub const VHDL_EXTS: &[&str] = &["vhd", "vhdl", "vho", "vht"];

/// Language of an HDL source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HdlLanguage {
    /// Verilog-2005.
    Verilog,
    /// SystemVerilog.
    SystemVerilog,
    /// VHDL.
    Vhdl,
    /// Anything else.
    #[default]
    Unknown,
}

impl HdlLanguage {
    /// Detects the language from a file extension.
    pub fn from_path(p: &str) -> Self {
        let ext = path::extension(p);
        if VERILOG_EXTS.contains(&ext.as_str()) {
            HdlLanguage::Verilog
        } else if SYSTEM_VERILOG_EXTS.contains(&ext.as_str()) {
            HdlLanguage::SystemVerilog
        } else if VHDL_EXTS.contains(&ext.as_str()) {
            HdlLanguage::Vhdl
        } else {
            HdlLanguage::Unknown
        }
    }

    /// Maps the language id reported by a fast parser.
    ///
    /// Parsers report the short ids `vlog`, `svlog` and `vhdl`; the long names
    /// are accepted too.
    pub fn from_language_id(id: &str) -> Self {
        match id.to_ascii_lowercase().as_str() {
            "vlog" | "verilog" => HdlLanguage::Verilog,
            "svlog" | "systemverilog" => HdlLanguage::SystemVerilog,
            "vhdl" => HdlLanguage::Vhdl,
            _ => HdlLanguage::Unknown,
        }
    }

    /// Returns `true` if `p` has any recognized HDL extension.
    pub fn is_hdl_path(p: &str) -> bool {
        HdlLanguage::from_path(p) != HdlLanguage::Unknown
    }

    /// Display name used in logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            HdlLanguage::Verilog => "verilog",
            HdlLanguage::SystemVerilog => "systemverilog",
            HdlLanguage::Vhdl => "vhdl",
            HdlLanguage::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for HdlLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_extension() {
        assert_eq!(HdlLanguage::from_path("/p/top.v"), HdlLanguage::Verilog);
        assert_eq!(HdlLanguage::from_path("/p/defs.VH"), HdlLanguage::Verilog);
        assert_eq!(HdlLanguage::from_path("/p/tb.sv"), HdlLanguage::SystemVerilog);
        assert_eq!(HdlLanguage::from_path("/p/alu.vhd"), HdlLanguage::Vhdl);
        assert_eq!(HdlLanguage::from_path("/p/notes.txt"), HdlLanguage::Unknown);
    }

    #[test]
    fn align_parser_ids() {
        assert_eq!(HdlLanguage::from_language_id("vlog"), HdlLanguage::Verilog);
        assert_eq!(HdlLanguage::from_language_id("svlog"), HdlLanguage::SystemVerilog);
        assert_eq!(HdlLanguage::from_language_id("vhdl"), HdlLanguage::Vhdl);
        assert_eq!(HdlLanguage::from_language_id("tcl"), HdlLanguage::Unknown);
    }

    #[test]
    fn hdl_path_filter() {
        assert!(HdlLanguage::is_hdl_path("a/b/c.vhdl"));
        assert!(!HdlLanguage::is_hdl_path("a/b/c.xdc"));
    }

    #[test]
    fn serializes_lowercase() {
        let s = serde_json::to_string(&HdlLanguage::SystemVerilog).unwrap();
        assert_eq!(s, "\"systemverilog\"");
    }
}
