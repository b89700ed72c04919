// Mon Oct 12 2026 - Alex

//! Backend-neutral marshalling statements.
//!
//! A statement list is what a code emitter turns into source text. The
//! `Display` impls render a compact pseudo-code used in reports and tests.

use crate::interface::VtableOffset;
use serde::Serialize;
use std::fmt;

/// A storage location read or written by a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Place {
    /// Managed-side element: a struct member, a parameter or a managed local.
    Managed(String),
    /// Member of the native shadow struct.
    Native(String),
    /// Native-side local introduced by a callable plan.
    Local(String),
    Element { array: Box<Place>, index: String },
    Deref(Box<Place>),
}

impl Place {
    pub fn element(&self, index: &str) -> Place {
        Place::Element {
            array: Box::new(self.clone()),
            index: index.to_string(),
        }
    }

    pub fn deref(&self) -> Place {
        Place::Deref(Box::new(self.clone()))
    }

    pub fn read(&self) -> Value {
        Value::Read(self.clone())
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed(name) | Self::Local(name) => write!(f, "{}", name),
            Self::Native(name) => write!(f, "@ref.{}", name),
            Self::Element { array, index } => write!(f, "{}[{}]", array, index),
            Self::Deref(inner) => write!(f, "*{}", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Value {
    Read(Place),
    Null,
    Zero,
    Literal(i64),
    /// Constant expression copied verbatim from a relation.
    Constant(String),
    Cast { target: String, value: Box<Value> },
    BoolToInt(Box<Value>),
    IntToBool(Box<Value>),
    /// Element count of a managed array; zero when the array is absent.
    LengthOf(Place),
    Extract { storage: Box<Value>, offset: u32, mask: u64 },
    /// `storage` with the masked bit run replaced by `value`; other bits are kept.
    Insert { storage: Box<Value>, value: Box<Value>, offset: u32, mask: u64 },
    SizeOf(String),
    AllocNative { element: String, count: Box<Value> },
    StackAlloc { element: String, count: Box<Value> },
    NewManagedArray { element: String, count: Box<Value> },
    /// Native pointer held by a managed interface wrapper; zero for none.
    NativePointerOf(Place),
    WrapInterface { interface: String, pointer: Box<Value> },
    /// Native entry point generated for a callback member.
    Trampoline(String),
    FunctionPointerFor(Place),
    AddressOf(Place),
    Conditional { condition: Box<Condition>, then: Box<Value>, otherwise: Box<Value> },
}

impl Value {
    pub fn cast(target: &str, value: Value) -> Value {
        Value::Cast {
            target: target.to_string(),
            value: Box::new(value),
        }
    }

    pub fn conditional(condition: Condition, then: Value, otherwise: Value) -> Value {
        Value::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(place) => write!(f, "{}", place),
            Self::Null => write!(f, "null"),
            Self::Zero => write!(f, "0"),
            Self::Literal(value) => write!(f, "{}", value),
            Self::Constant(expression) => write!(f, "{}", expression),
            Self::Cast { target, value } => write!(f, "({}){}", target, value),
            Self::BoolToInt(value) => write!(f, "({} ? 1 : 0)", value),
            Self::IntToBool(value) => write!(f, "({} != 0)", value),
            Self::LengthOf(place) => write!(f, "len({})", place),
            Self::Extract { storage, offset, mask } => write!(f, "(({} >> {}) & 0x{:x})", storage, offset, mask),
            Self::Insert {
                storage,
                value,
                offset,
                mask,
            } => write!(
                f,
                "(({} & ~(0x{:x} << {})) | (({} & 0x{:x}) << {}))",
                storage, mask, offset, value, mask, offset
            ),
            Self::SizeOf(type_name) => write!(f, "sizeof({})", type_name),
            Self::AllocNative { element, count } => write!(f, "alloc<{}>({})", element, count),
            Self::StackAlloc { element, count } => write!(f, "stackalloc<{}>({})", element, count),
            Self::NewManagedArray { element, count } => write!(f, "new {}[{}]", element, count),
            Self::NativePointerOf(place) => write!(f, "native_ptr({})", place),
            Self::WrapInterface { interface, pointer } => write!(f, "wrap<{}>({})", interface, pointer),
            Self::Trampoline(name) => write!(f, "native_entry<{}>", name),
            Self::FunctionPointerFor(place) => write!(f, "fn_ptr({})", place),
            Self::AddressOf(place) => write!(f, "&{}", place),
            Self::Conditional {
                condition,
                then,
                otherwise,
            } => write!(f, "({} ? {} : {})", condition, then, otherwise),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Condition {
    HasValue(Place),
    NotNull(Place),
    GreaterThanZero(Value),
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasValue(place) => write!(f, "{}.has_value", place),
            Self::NotNull(place) => write!(f, "{} != null", place),
            Self::GreaterThanZero(value) => write!(f, "{} > 0", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StructMarshalMethod {
    To,
    From,
    Free,
}

impl fmt::Display for StructMarshalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::To => "marshal_to",
            Self::From => "marshal_from",
            Self::Free => "marshal_free",
        };
        f.write_str(name)
    }
}

/// Keeps a managed buffer at a fixed address for the duration of a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinScope {
    pub pointer: String,
    pub element: String,
    pub target: Place,
}

impl fmt::Display for PinScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed ({}* {} = {})", self.element, self.pointer, self.target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CallTarget {
    Vtable(VtableOffset),
    Function(String),
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vtable(offset) => write!(f, "vtbl[{}]", offset),
            Self::Function(symbol) => write!(f, "{}", symbol),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MarshalStatement {
    Assign {
        target: Place,
        value: Value,
    },
    If {
        condition: Condition,
        body: Vec<MarshalStatement>,
        otherwise: Vec<MarshalStatement>,
    },
    ForEach {
        index: String,
        count: Value,
        body: Vec<MarshalStatement>,
    },
    /// Debug-build check that a managed array fits a fixed native capacity.
    DebugAssertLength {
        array: Place,
        capacity: u32,
    },
    StructMarshal {
        method: StructMarshalMethod,
        managed: Place,
        native: Place,
    },
    /// Runs the same method on the base aggregate's native part.
    BaseMarshal(StructMarshalMethod),
    FreeNative(Place),
    KeepAlive(Place),
    DeclareLocal {
        name: String,
        type_name: String,
        value: Option<Value>,
    },
    Call {
        target: CallTarget,
        arguments: Vec<Value>,
        result: Option<Place>,
    },
    Pinned {
        pin: PinScope,
        body: Vec<MarshalStatement>,
    },
    CheckError(Place),
    Return(Value),
}

impl MarshalStatement {
    pub fn assign(target: Place, value: Value) -> Self {
        Self::Assign { target, value }
    }

    pub fn declare(name: &str, type_name: &str, value: Option<Value>) -> Self {
        Self::DeclareLocal {
            name: name.to_string(),
            type_name: type_name.to_string(),
            value,
        }
    }

    /// Depth-first visit of this statement and every nested one.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a MarshalStatement)) {
        visit(self);
        let children: Vec<&MarshalStatement> = match self {
            Self::If { body, otherwise, .. } => body.iter().chain(otherwise.iter()).collect(),
            Self::ForEach { body, .. } | Self::Pinned { body, .. } => body.iter().collect(),
            _ => Vec::new(),
        };
        for child in children {
            child.walk(visit);
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let pad = "    ".repeat(depth);
        match self {
            Self::Assign { target, value } => writeln!(f, "{}{} = {};", pad, target, value),
            Self::If {
                condition,
                body,
                otherwise,
            } => {
                writeln!(f, "{}if ({}) {{", pad, condition)?;
                write_block(f, body, depth + 1)?;
                if otherwise.is_empty() {
                    writeln!(f, "{}}}", pad)
                } else {
                    writeln!(f, "{}}} else {{", pad)?;
                    write_block(f, otherwise, depth + 1)?;
                    writeln!(f, "{}}}", pad)
                }
            }
            Self::ForEach { index, count, body } => {
                writeln!(f, "{}for ({} = 0; {} < {}; {}++) {{", pad, index, index, count, index)?;
                write_block(f, body, depth + 1)?;
                writeln!(f, "{}}}", pad)
            }
            Self::DebugAssertLength { array, capacity } => {
                writeln!(f, "{}debug_assert(len({}) <= {});", pad, array, capacity)
            }
            Self::StructMarshal { method, managed, native } => {
                writeln!(f, "{}{}.{}(ref {});", pad, managed, method, native)
            }
            Self::BaseMarshal(method) => writeln!(f, "{}base.{}(ref @ref.Base);", pad, method),
            Self::FreeNative(place) => writeln!(f, "{}free({});", pad, place),
            Self::KeepAlive(place) => writeln!(f, "{}keep_alive({});", pad, place),
            Self::DeclareLocal { name, type_name, value } => match value {
                Some(value) => writeln!(f, "{}{} {} = {};", pad, type_name, name, value),
                None => writeln!(f, "{}{} {};", pad, type_name, name),
            },
            Self::Call {
                target,
                arguments,
                result,
            } => {
                let arguments: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
                match result {
                    Some(result) => writeln!(f, "{}{} = {}({});", pad, result, target, arguments.join(", ")),
                    None => writeln!(f, "{}{}({});", pad, target, arguments.join(", ")),
                }
            }
            Self::Pinned { pin, body } => {
                writeln!(f, "{}{} {{", pad, pin)?;
                write_block(f, body, depth + 1)?;
                writeln!(f, "{}}}", pad)
            }
            Self::CheckError(place) => writeln!(f, "{}{}.check_error();", pad, place),
            Self::Return(value) => writeln!(f, "{}return {};", pad, value),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, statements: &[MarshalStatement], depth: usize) -> fmt::Result {
    for statement in statements {
        statement.write_indented(f, depth)?;
    }
    Ok(())
}

impl fmt::Display for MarshalStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Renders a statement list as pseudo-code.
pub fn render(statements: &[MarshalStatement]) -> String {
    statements.iter().map(|s| s.to_string()).collect()
}
