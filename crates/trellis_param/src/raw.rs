//! Input contract produced by the fast-parse collaborator.
//!
//! One [`ParsedFile`] describes everything the registry needs from a source
//! file: its language, its macro table and the modules it declares, each with
//! ports, parameters and instantiations. The JSON shape is the one emitted by
//! external fast parsers (`languageId`, `macro`, `content`, instance `type`).

use serde::{Deserialize, Serialize};
use trellis_source::Range;

/// The fast-parse result for one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    /// Parser language id (`vlog`, `svlog`, `vhdl`, ...).
    #[serde(default)]
    pub language_id: String,
    /// Defines and includes.
    #[serde(default, rename = "macro")]
    pub macro_table: MacroTable,
    /// Declared modules, in source order.
    #[serde(default)]
    pub content: Vec<RawModule>,
}

impl ParsedFile {
    /// Creates a parse result with the given language id and no modules.
    pub fn new(language_id: &str) -> Self {
        Self {
            language_id: language_id.to_string(),
            ..Self::default()
        }
    }

    /// Appends a module.
    pub fn with_module(mut self, module: RawModule) -> Self {
        self.content.push(module);
        self
    }

    /// Appends an include directive.
    pub fn with_include(mut self, path: &str) -> Self {
        self.macro_table.includes.push(MacroInclude {
            path: path.to_string(),
            range: Range::EMPTY,
        });
        self
    }

    /// Appends a macro definition.
    pub fn with_define(mut self, name: &str, replacement: &str) -> Self {
        self.macro_table.defines.push(MacroDefine {
            name: name.to_string(),
            replacement: replacement.to_string(),
            range: Range::EMPTY,
        });
        self
    }
}

/// Preprocessor information of one file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTable {
    /// `define directives.
    #[serde(default)]
    pub defines: Vec<MacroDefine>,
    /// `include directives.
    #[serde(default)]
    pub includes: Vec<MacroInclude>,
}

/// A macro definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroDefine {
    /// Macro name.
    pub name: String,
    /// Replacement text.
    #[serde(default, alias = "value")]
    pub replacement: String,
    /// Location of the directive.
    #[serde(default)]
    pub range: Range,
}

/// An include directive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroInclude {
    /// The path literal as written, relative to the including file or absolute.
    pub path: String,
    /// Location of the directive.
    #[serde(default)]
    pub range: Range,
}

/// A module or entity declaration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModule {
    /// Module name.
    pub name: String,
    /// Declaration range.
    #[serde(default)]
    pub range: Range,
    /// Parameters (generics).
    #[serde(default)]
    pub params: Vec<Param>,
    /// Ports.
    #[serde(default)]
    pub ports: Vec<Port>,
    /// Instantiations, in source order.
    #[serde(default)]
    pub instances: Vec<RawInstance>,
}

impl RawModule {
    /// Creates an empty module declaration.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Appends an instantiation of `type_name` called `name`.
    pub fn with_instance(mut self, name: &str, type_name: &str) -> Self {
        self.instances.push(RawInstance::new(name, type_name));
        self
    }

    /// Appends a port.
    pub fn with_port(mut self, name: &str, direction: PortDirection, width: &str) -> Self {
        self.ports.push(Port {
            name: name.to_string(),
            direction,
            width: width.to_string(),
            signed: false,
            range: Range::EMPTY,
        });
        self
    }

    /// Appends a parameter with a default value.
    pub fn with_param(mut self, name: &str, init: &str) -> Self {
        self.params.push(Param {
            name: name.to_string(),
            init: init.to_string(),
            range: Range::EMPTY,
        });
        self
    }

    /// Replaces the declaration range.
    pub fn at(mut self, range: Range) -> Self {
        self.range = range;
        self
    }
}

/// One instantiation inside a module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    /// Instance name.
    pub name: String,
    /// Instantiated module type, as written.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Range of the parameter-override list, if any.
    #[serde(default)]
    pub instparams: Option<Range>,
    /// Range of the port-connection list, if any.
    #[serde(default)]
    pub instports: Option<Range>,
    /// Range of the whole instantiation.
    #[serde(default)]
    pub range: Range,
}

impl RawInstance {
    /// Creates an instantiation without argument ranges.
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            instparams: None,
            instports: None,
            range: Range::EMPTY,
        }
    }
}

/// Port direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// `input` / `in`.
    #[serde(alias = "in")]
    Input,
    /// `output` / `out`.
    #[serde(alias = "out")]
    Output,
    /// `inout`.
    Inout,
    /// Not reported by the parser.
    #[default]
    #[serde(other)]
    Unknown,
}

/// A port declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Direction (the parser's `type` field).
    #[serde(default, rename = "type")]
    pub direction: PortDirection,
    /// Width text, e.g. `[7:0]`; empty for scalar ports.
    #[serde(default)]
    pub width: String,
    /// `signed` qualifier.
    #[serde(default)]
    pub signed: bool,
    /// Declaration range.
    #[serde(default)]
    pub range: Range,
}

/// A parameter or generic declaration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Default value text.
    #[serde(default)]
    pub init: String,
    /// Declaration range.
    #[serde(default)]
    pub range: Range,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fast_parser_json() {
        let json = r#"{
            "languageId": "vlog",
            "macro": {
                "defines": [{"name": "WIDTH", "value": "8"}],
                "includes": [{"path": "./defs.vh"}]
            },
            "content": [{
                "name": "top",
                "range": {"start": {"line": 0, "character": 0}, "end": {"line": 9, "character": 9}},
                "ports": [{"name": "clk", "type": "input"}, {"name": "q", "type": "out", "width": "[7:0]"}],
                "params": [{"name": "N", "init": "4"}],
                "instances": [{"name": "u0", "type": "leaf", "instports": {"start": {"line": 3, "character": 2}, "end": {"line": 3, "character": 20}}}]
            }]
        }"#;
        let parsed: ParsedFile = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.language_id, "vlog");
        assert_eq!(parsed.macro_table.defines[0].replacement, "8");
        assert_eq!(parsed.macro_table.includes[0].path, "./defs.vh");
        let top = &parsed.content[0];
        assert_eq!(top.range.end.line, 9);
        assert_eq!(top.ports[0].direction, PortDirection::Input);
        assert_eq!(top.ports[1].direction, PortDirection::Output);
        assert_eq!(top.ports[1].width, "[7:0]");
        assert_eq!(top.params[0].init, "4");
        assert_eq!(top.instances[0].type_name, "leaf");
        assert!(top.instances[0].instparams.is_none());
        assert_eq!(top.instances[0].instports.map(|r| r.start.line), Some(3));
    }

    #[test]
    fn missing_sections_default() {
        let parsed: ParsedFile = serde_json::from_str(r#"{"content": [{"name": "m"}]}"#).unwrap();
        assert!(parsed.language_id.is_empty());
        assert!(parsed.macro_table.includes.is_empty());
        assert!(parsed.content[0].instances.is_empty());
    }

    #[test]
    fn unknown_port_direction() {
        let port: Port = serde_json::from_str(r#"{"name": "p", "type": "buffer"}"#).unwrap();
        assert_eq!(port.direction, PortDirection::Unknown);
    }

    #[test]
    fn builders_compose() {
        let parsed = ParsedFile::new("svlog")
            .with_include("pkg.svh")
            .with_define("DEPTH", "16")
            .with_module(RawModule::new("top").with_instance("u_leaf", "leaf"));
        assert_eq!(parsed.content[0].instances[0].name, "u_leaf");
        assert_eq!(parsed.macro_table.includes.len(), 1);
        assert_eq!(parsed.macro_table.defines[0].name, "DEPTH");
    }
}
