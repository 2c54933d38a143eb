use std::fmt;
use std::rc::Rc;

use crate::builtins::{Builtin, BuiltinKind};
use crate::error::{ArityKind, Error, Result};
use crate::runtime::Environment;

/// Runtime value representation
///
/// Code and data share this one type: the parser produces `Value`s and the
/// evaluator consumes them.
#[derive(Clone)]
pub enum Value {
    /// The empty list, also the list terminator
    Nil,
    /// `True` or `False`
    Bool(bool),
    /// Double-precision number
    Number(f64),
    /// Immutable text
    String(Rc<str>),
    /// Name used for lookup
    Symbol(Rc<str>),
    /// Cons cell; the tail is always `Nil` or another `Pair`
    Pair(Rc<Pair>),
    /// A value marked as data rather than code
    Quoted(Rc<Value>),
    /// Host function receiving evaluated arguments
    NativeFunction(Rc<dyn Builtin>),
    /// Host special form receiving raw argument forms and the calling scope
    NativeSpecialForm(Rc<dyn Builtin>),
    /// User function (`fn`)
    Closure(Rc<Lambda>),
    /// User macro (`macro`)
    Macro(Rc<Lambda>),
    /// A lexical scope exposed as a value
    Environment(Environment),
}

/// A cons cell
///
/// Fields are private so every pair goes through [`Value::cons`] or
/// [`Value::list`], which keep the tail a proper list.
#[derive(Clone)]
pub struct Pair {
    head: Value,
    tail: Value,
}

impl Pair {
    /// First element
    pub fn head(&self) -> &Value {
        &self.head
    }

    /// Remaining list (`Nil` or `Pair`)
    pub fn tail(&self) -> &Value {
        &self.tail
    }
}

// Unlinks the tail spine one cell at a time so long lists drop without recursion
impl Drop for Pair {
    fn drop(&mut self) {
        let mut tail = std::mem::replace(&mut self.tail, Value::Nil);
        while let Value::Pair(cell) = tail {
            match Rc::try_unwrap(cell) {
                Ok(mut pair) => tail = std::mem::replace(&mut pair.tail, Value::Nil),
                Err(_) => break,
            }
        }
    }
}

/// Parameters, body and captured scope of a closure or macro
pub struct Lambda {
    params: Vec<String>,
    body: Value,
    scope: Environment,
}

impl Lambda {
    /// Creates a lambda capturing `scope`
    pub fn new(params: Vec<String>, body: Value, scope: Environment) -> Self {
        Lambda {
            params,
            body,
            scope,
        }
    }

    /// Parameter names, in order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Body expression
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Scope captured at creation
    pub fn scope(&self) -> &Environment {
        &self.scope
    }

    /// `(a b c)`
    pub fn param_list(&self) -> String {
        format!("({})", self.params.join(" "))
    }
}

/// Iterator over the elements of a proper list
pub struct ListIter<'a> {
    current: &'a Value,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self.current {
            Value::Pair(pair) => {
                self.current = &pair.tail;
                Some(&pair.head)
            }
            _ => None,
        }
    }
}

impl Value {
    /// The `True` singleton
    pub const TRUE: Value = Value::Bool(true);
    /// The `False` singleton
    pub const FALSE: Value = Value::Bool(false);

    /// Creates a string value
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::String(text.into())
    }

    /// Creates a symbol value
    pub fn symbol(name: impl Into<Rc<str>>) -> Self {
        Value::Symbol(name.into())
    }

    /// Wraps a value as quoted data
    pub fn quoted(value: Value) -> Self {
        Value::Quoted(Rc::new(value))
    }

    /// Maps a host boolean onto the boolean singletons
    pub fn bool(value: bool) -> Self {
        if value {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }

    /// Wraps a builtin as the value tag matching its kind
    pub fn native(builtin: Rc<dyn Builtin>) -> Self {
        match builtin.kind() {
            BuiltinKind::Function => Value::NativeFunction(builtin),
            BuiltinKind::SpecialForm => Value::NativeSpecialForm(builtin),
        }
    }

    /// Prepends `head` to the list `tail`
    ///
    /// Fails with a type error unless `tail` is `Nil` or a `Pair`.
    pub fn cons(head: Value, tail: Value) -> Result<Self> {
        if !tail.is_list() {
            return Err(Error::type_error("list", tail.type_name()));
        }
        Ok(Value::Pair(Rc::new(Pair { head, tail })))
    }

    /// Builds a proper list from a sequence of values
    pub fn list(values: impl IntoIterator<Item = Value>) -> Self {
        let items: Vec<Value> = values.into_iter().collect();
        items.into_iter().rev().fold(Value::Nil, |tail, head| {
            Value::Pair(Rc::new(Pair { head, tail }))
        })
    }

    /// True for the empty list
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True for `Nil` and `Pair`
    pub fn is_list(&self) -> bool {
        matches!(self, Value::Nil | Value::Pair(_))
    }

    /// True for the four callable tags
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::NativeFunction(_)
                | Value::NativeSpecialForm(_)
                | Value::Closure(_)
                | Value::Macro(_)
        )
    }

    /// Iterates the elements of a list (empty for non-lists)
    pub fn iter(&self) -> ListIter<'_> {
        ListIter { current: self }
    }

    /// Number of elements in a list
    pub fn list_len(&self) -> usize {
        self.iter().count()
    }

    /// Copies the elements of a list into a vector
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// Destructures a list of exactly `N` elements
    pub fn expect_args<const N: usize>(&self, callee: &str) -> Result<[Value; N]> {
        let items = self.to_vec();
        let got = items.len();
        items.try_into().map_err(|_| Error::ArityError {
            callee: callee.to_string(),
            expected: N.to_string(),
            got,
            kind: if got < N {
                ArityKind::TooFew
            } else {
                ArityKind::TooMany
            },
        })
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil | Value::Pair(_) => "list",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Quoted(_) => "quoted",
            Value::NativeFunction(_) => "builtin",
            Value::NativeSpecialForm(_) => "specialform",
            Value::Closure(_) => "function",
            Value::Macro(_) => "macro",
            Value::Environment(_) => "environment",
        }
    }

    /// Returns the symbol name, or a type error
    pub fn as_symbol(&self) -> Result<&str> {
        match self {
            Value::Symbol(name) => Ok(name),
            _ => Err(Error::type_error("symbol", self.type_name())),
        }
    }

    /// Returns the string contents, or a type error
    pub fn as_string(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(Error::type_error("string", self.type_name())),
        }
    }

    /// Identity comparison
    ///
    /// Singletons and numbers compare by value (numbers bitwise, so `NaN` is
    /// itself), symbols by name, and everything else by reference.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b),
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b),
            (Value::Quoted(a), Value::Quoted(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b))
            | (Value::NativeSpecialForm(a), Value::NativeSpecialForm(b)) => {
                Rc::ptr_eq(a, b)
            }
            (Value::Closure(a), Value::Closure(b)) | (Value::Macro(a), Value::Macro(b)) => {
                Rc::ptr_eq(a, b)
            }
            (Value::Environment(a), Value::Environment(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Source-like rendering (`repr`)
    pub fn repr(&self) -> String {
        self.to_string()
    }

    /// Display rendering (`str`): like `repr`, but a bare string is its raw text
    pub fn to_display_string(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            other => other.repr(),
        }
    }

    /// Writes the rendering, tracking the scopes already being rendered
    ///
    /// A scope reached again while its own bindings are being written (a
    /// scope holding itself, directly or inside a list) renders as
    /// `<environment>`.
    fn write_repr(&self, f: &mut fmt::Formatter, open: &mut Vec<Environment>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "()"),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Symbol(name) => write!(f, "{}", name),
            Value::Pair(_) => {
                write!(f, "(")?;
                for (i, item) in self.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    item.write_repr(f, open)?;
                }
                write!(f, ")")
            }
            Value::Quoted(inner) => {
                write!(f, "'")?;
                inner.write_repr(f, open)
            }
            Value::NativeFunction(native) | Value::NativeSpecialForm(native) => {
                write!(f, "<{} \"{}\">", self.type_name(), native.name())
            }
            Value::Closure(lambda) | Value::Macro(lambda) => {
                write!(f, "<{} {} -> ", self.type_name(), lambda.param_list())?;
                lambda.body.write_repr(f, open)?;
                write!(f, ">")
            }
            Value::Environment(env) => {
                if open.iter().any(|seen| seen.ptr_eq(env)) {
                    return write!(f, "<environment>");
                }
                open.push(env.clone());
                let result = Value::write_environment(env, f, open);
                open.pop();
                result
            }
        }
    }

    fn write_environment(
        env: &Environment,
        f: &mut fmt::Formatter,
        open: &mut Vec<Environment>,
    ) -> fmt::Result {
        write!(f, "<environment {{")?;
        for (i, (name, value)) in env.local_bindings().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=", name)?;
            value.write_repr(f, open)?;
        }
        write!(f, "}}>")
    }
}

/// Renders a number the way literals are written back
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_repr(f, &mut Vec::new())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

// Structural equality; callables and environments compare by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(_), Value::Pair(_)) => {
                let (mut left, mut right) = (self.iter(), other.iter());
                loop {
                    match (left.next(), right.next()) {
                        (Some(a), Some(b)) if a == b => continue,
                        (None, None) => return true,
                        _ => return false,
                    }
                }
            }
            (Value::Quoted(a), Value::Quoted(b)) => a == b,
            _ => self.is_identical(other),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
