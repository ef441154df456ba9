//! Runtime value representation and fundamental operations.

use std::sync::Arc;

// ---------------------------------------------------------------------------
// Core value types
// ---------------------------------------------------------------------------

/// Runtime Eevo value.
#[derive(Clone, Debug)]
pub enum Value {
    /// No value at all; the result of effect-only calls.
    Void,
    /// Empty list and list terminator.
    Nil,
    Int(i64),
    Dec(f64),
    Text(Arc<String>),
    Symbol(String),
    Pair(Arc<ConsCell>),
    /// Ordered named fields.
    Record(Arc<Vec<(String, Value)>>),
    /// Built-in primitive reference (canonical name).  Dispatched by the evaluator.
    Prim(&'static str),
}

#[derive(Clone, Debug)]
pub struct ConsCell {
    pub car: Value,
    pub cdr: Value,
}

impl Drop for ConsCell {
    // Unlink the cdr chain in a loop; the derived drop would recurse once
    // per element.
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.cdr, Value::Nil);
        while let Value::Pair(cell) = next {
            match Arc::try_unwrap(cell) {
                Ok(mut owned) => next = std::mem::replace(&mut owned.cdr, Value::Nil),
                // Still shared: whoever holds the other reference drops it.
                Err(_) => break,
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Void,
    Nil,
    Int,
    Dec,
    Text,
    Symbol,
    Pair,
    Record,
    Prim,
}

impl ValueTag {
    /// Name of the type predicate reported in `wrong-type-argument` signals.
    pub fn predicate(self) -> &'static str {
        match self {
            ValueTag::Void => "voidp",
            ValueTag::Nil => "nilp",
            ValueTag::Int => "integerp",
            ValueTag::Dec => "decimalp",
            ValueTag::Text => "textp",
            ValueTag::Symbol => "symbolp",
            ValueTag::Pair => "pairp",
            ValueTag::Record => "recordp",
            ValueTag::Prim => "primitivep",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Nil, Value::Nil) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Dec(a), Value::Dec(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Pair(a), Value::Pair(b)) => pairs_eq(a, b),
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Prim(a), Value::Prim(b)) => a == b,
            _ => false,
        }
    }
}

fn pairs_eq(a: &Arc<ConsCell>, b: &Arc<ConsCell>) -> bool {
    let (mut a, mut b) = (a, b);
    loop {
        if a.car != b.car {
            return false;
        }
        match (&a.cdr, &b.cdr) {
            (Value::Pair(next_a), Value::Pair(next_b)) => {
                a = next_a;
                b = next_b;
            }
            (tail_a, tail_b) => return tail_a == tail_b,
        }
    }
}

// ---------------------------------------------------------------------------
// Value constructors
// ---------------------------------------------------------------------------

impl Value {
    pub fn symbol(s: impl Into<String>) -> Self {
        Value::Symbol(s.into())
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Arc::new(s.into()))
    }

    pub fn cons(car: Value, cdr: Value) -> Self {
        Value::Pair(Arc::new(ConsCell { car, cdr }))
    }

    pub fn list(values: Vec<Value>) -> Self {
        values
            .into_iter()
            .rev()
            .fold(Value::Nil, |acc, item| Value::cons(item, acc))
    }

    pub fn record(fields: Vec<(String, Value)>) -> Self {
        Value::Record(Arc::new(fields))
    }

    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Void => ValueTag::Void,
            Value::Nil => ValueTag::Nil,
            Value::Int(_) => ValueTag::Int,
            Value::Dec(_) => ValueTag::Dec,
            Value::Text(_) => ValueTag::Text,
            Value::Symbol(_) => ValueTag::Symbol,
            Value::Pair(_) => ValueTag::Pair,
            Value::Record(_) => ValueTag::Record,
            Value::Prim(_) => ValueTag::Prim,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}
