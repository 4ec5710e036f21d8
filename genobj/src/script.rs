use std::sync::Arc;

use ahash::AHashMap;

use genobj::{Class, Receiver, Registry, RegistryCreateInfo, Value};

/// Interpreter state for the line-oriented driver language.
///
/// ```text
/// class Shape
/// class Square : Shape
/// allow Shape color height
/// let s = Shape new color red
/// s color blue
/// s get_color
/// ```
pub struct Session {
    registry: Arc<Registry>,
    classes: AHashMap<String, Class>,
    variables: AHashMap<String, Value>,
}

enum Target {
    Class(Class),
    Value(Value),
}

impl Session {
    pub fn new(info: RegistryCreateInfo) -> Self {
        Self {
            registry: Registry::new(info),
            classes: AHashMap::new(),
            variables: AHashMap::new(),
        }
    }

    /// Run every line of `source`, returning the results of message sends
    /// in order. Stops at the first error, reported with its line number.
    pub fn execute_source(
        &mut self,
        source: &str,
    ) -> Result<Vec<Value>, String> {
        let mut results = Vec::new();
        for (index, line) in source.lines().enumerate() {
            match self.execute_line(line) {
                Ok(Some(value)) => results.push(value),
                Ok(None) => {}
                Err(err) => return Err(format!("line {}: {err}", index + 1)),
            }
        }
        Ok(results)
    }

    /// Execute one command. Sends yield `Some(result)`; definitions,
    /// declarations, bindings and blank lines yield `None`.
    pub fn execute_line(
        &mut self,
        line: &str,
    ) -> Result<Option<Value>, String> {
        let line = match line.find('#') {
            Some(comment) => &line[..comment],
            None => line,
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Ok(None),
            ["class", name] => {
                self.define_class(name, None)?;
                Ok(None)
            }
            ["class", name, ":", parent] => {
                self.define_class(name, Some(*parent))?;
                Ok(None)
            }
            ["class", ..] => Err("usage: class Name [: Parent]".to_string()),
            ["allow", name, keys @ ..] => {
                let class = self.class(name)?;
                class.declare_allowed(keys.iter().copied());
                Ok(None)
            }
            ["let", name, "=", command @ ..] => {
                let value = self.send(command)?;
                self.variables.insert((*name).to_string(), value);
                Ok(None)
            }
            ["let", ..] => {
                Err("usage: let name = target selector [args]".to_string())
            }
            command => self.send(command).map(Some),
        }
    }

    fn define_class(
        &mut self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<(), String> {
        let class = match parent {
            Some(parent) => self.class(parent)?.subclass(name),
            None => self.registry.define_class(name),
        };
        self.classes.insert(name.to_string(), class);
        Ok(())
    }

    fn class(&self, name: &str) -> Result<Class, String> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| format!("unknown class `{name}`"))
    }

    fn send(&self, command: &[&str]) -> Result<Value, String> {
        let [target, selector, args @ ..] = command else {
            return Err("expected: target selector [args]".to_string());
        };
        let args = args
            .iter()
            .map(|arg| self.parse_argument(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let value = match self.target(target)? {
            Target::Class(class) => class.send(selector, &args),
            Target::Value(value) => value.send(selector, &args),
        };
        Ok(value)
    }

    fn target(&self, name: &str) -> Result<Target, String> {
        if let Some(value) = self.variables.get(name) {
            return Ok(Target::Value(value.clone()));
        }
        if let Some(class) = self.classes.get(name) {
            return Ok(Target::Class(class.clone()));
        }
        Err(format!("unknown variable or class `{name}`"))
    }

    fn parse_argument(&self, token: &str) -> Result<Value, String> {
        if let Some(name) = token.strip_prefix('$') {
            return self
                .variables
                .get(name)
                .cloned()
                .ok_or_else(|| format!("unknown variable `{name}`"));
        }
        Ok(parse_literal(token))
    }
}

fn parse_literal(token: &str) -> Value {
    if let Ok(value) = token.parse::<i64>() {
        return Value::Int(value);
    }
    if let Ok(value) = token.parse::<f64>() {
        return Value::Float(value);
    }
    match token {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::from(
            token
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .unwrap_or(token),
        ),
    }
}

/// How the driver prints a result. The sentinel displays as an empty
/// string, which would be invisible on a terminal.
pub fn format_result(value: &Value) -> String {
    if value.is_sentinel() {
        "<false>".to_string()
    } else {
        value.to_string()
    }
}
