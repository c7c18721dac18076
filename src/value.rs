use std::fmt;

/// Runtime value. All arithmetic, comparison, and logical operators work
/// over integers; the other kinds narrow through [`Value::as_int`] at the
/// operator boundary. That single coercion rule is applied everywhere:
///
/// - `Int` is itself
/// - `Bool` is 0 or 1
/// - `Char` is its code point
/// - `Str` is its length in bytes (a quirk of the original evaluator,
///   kept for compatibility)
/// - `Float` truncates
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
}

impl Value {
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Float(f) => *f as i64,
            Value::Str(s) => s.len() as i64,
            Value::Char(c) => *c as i64,
            Value::Bool(b) => i64::from(*b),
        }
    }

    pub fn is_truthy(&self) -> bool {
        self.as_int() != 0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::Char(c) => write!(f, "{}", c),
            Value::Bool(true) => write!(f, "vrai"),
            Value::Bool(false) => write!(f, "faux"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_coercion_rule() {
        assert_eq!(Value::Int(7).as_int(), 7);
        assert_eq!(Value::Bool(true).as_int(), 1);
        assert_eq!(Value::Bool(false).as_int(), 0);
        assert_eq!(Value::Str("abc".to_string()).as_int(), 3);
        assert_eq!(Value::Char('A').as_int(), 65);
        assert_eq!(Value::Float(3.9).as_int(), 3);
    }

    #[test]
    fn truthiness_follows_the_integer_domain() {
        assert!(Value::Int(-1).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(Value::Str("x".to_string()).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
    }
}
