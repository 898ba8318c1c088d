//! Type system definitions.
//!
//! Kobe has four primitive kinds and one type constructor for functions:
//!
//! - `num` for numbers, `baal` for booleans, `quote` for strings
//! - `void` for functions that output nothing
//! - function types built from parameter types and a return type
//!
//! Assignability is kind equality. There is no widening and no subtyping.

use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

lazy_static! {
    pub static ref TYPE_LOOKUP: HashMap<&'static str, Type> = {
        let mut map = HashMap::new();
        map.insert("num", Type::Num);
        map.insert("baal", Type::Baal);
        map.insert("quote", Type::Quote);
        map.insert("void", Type::Void);
        map
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Num,
    Baal,
    Quote,
    Void,
    Function(FunctionType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub param_types: Vec<Type>,
    pub return_type: Box<Type>,
}

impl FunctionType {
    pub fn new(param_types: Vec<Type>, return_type: Type) -> Self {
        FunctionType {
            param_types,
            return_type: Box::new(return_type),
        }
    }
}

impl Type {
    /// Looks up a primitive type by its source name.
    pub fn from_name(name: &str) -> Option<Type> {
        TYPE_LOOKUP.get(name).cloned()
    }

    pub fn is_assignable_to(&self, target: &Type) -> bool {
        self == target
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Num)
    }

    /// Whether a value of this type can be stored in a variable.
    pub fn is_storable(&self) -> bool {
        matches!(self, Type::Num | Type::Baal | Type::Quote)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Num => write!(f, "num"),
            Type::Baal => write!(f, "baal"),
            Type::Quote => write!(f, "quote"),
            Type::Void => write!(f, "void"),
            Type::Function(function) => write!(f, "{}", function),
        }
    }
}

impl Display for FunctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self
            .param_types
            .iter()
            .map(|ty| ty.to_string())
            .collect::<Vec<String>>();
        write!(f, "({})->{}", params.join(","), self.return_type)
    }
}
