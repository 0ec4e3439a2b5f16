//! Function-level IR: parameters and the control-flow graph they feed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instruction::ControlFlowGraph;
use crate::value::Width;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub width: Width,
}

impl Parameter {
    pub fn new(name: impl Into<String>, width: Width) -> Self {
        Parameter {
            name: name.into(),
            width,
        }
    }
}

/// A function in the compiled module. Functions whose name starts with the
/// configured analysis-marker prefix are the ones the checker examines;
/// others (contract-marker identity functions, runtime intrinsics) exist
/// only to be called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_width: Option<Width>,
    pub cfg: ControlFlowGraph,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            parameters: Vec::new(),
            return_width: None,
            cfg: ControlFlowGraph::new(),
        }
    }

    pub fn with_parameter(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_return_width(mut self, width: Width) -> Self {
        self.return_width = Some(width);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        self.cfg.validate()?;
        if self.cfg.entry.is_none() {
            return Err(format!("function {} has no entry block", self.name));
        }
        Ok(())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn {}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", p.name, p.width)?;
        }
        write!(f, ")")?;
        if let Some(w) = self.return_width {
            write!(f, " -> {w}")?;
        }
        writeln!(f, " {{")?;
        let mut names: Vec<_> = self.cfg.blocks.keys().collect();
        names.sort();
        for name in names {
            write!(f, "{}", self.cfg.blocks[name])?;
        }
        writeln!(f, "}}")
    }
}
