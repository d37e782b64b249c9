//! `{variable}` placeholder substitution.

use std::collections::HashMap;

use regex::{Captures, Regex};

use crate::models::Variable;

/// Replace every configured `{key}` in `template` with its value.
///
/// Keys match case-insensitively. Placeholders for unknown keys are left
/// untouched, and substituted values are not expanded again.
pub fn substitute(template: &str, variables: &[Variable]) -> String {
    if template.is_empty() || variables.is_empty() {
        return template.to_string();
    }

    let mut values: HashMap<String, &str> = HashMap::new();
    for var in variables.iter().filter(|v| !v.key.is_empty()) {
        values.entry(var.key.to_lowercase()).or_insert(&var.value);
    }
    if values.is_empty() {
        return template.to_string();
    }

    let alternation = values
        .keys()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = match Regex::new(&format!(r"(?i)\{{({})\}}", alternation)) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid variable pattern, leaving text unchanged");
            return template.to_string();
        }
    };

    pattern
        .replace_all(template, |caps: &Captures<'_>| {
            let key = caps[1].to_lowercase();
            values
                .get(&key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Vec<Variable> {
        vec![
            Variable::new("empresa", "Loja Azul"),
            Variable::new("pix", "pix@loja.com"),
        ]
    }

    #[test]
    fn test_replaces_known_variables() {
        let out = substitute("Bem-vindo à {empresa}! PIX: {pix}", &vars());
        assert_eq!(out, "Bem-vindo à Loja Azul! PIX: pix@loja.com");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(substitute("{EMPRESA} / {Empresa}", &vars()), "Loja Azul / Loja Azul");
    }

    #[test]
    fn test_unknown_placeholder_untouched() {
        assert_eq!(substitute("Olá {nome}, {empresa}", &vars()), "Olá {nome}, Loja Azul");
    }

    #[test]
    fn test_idempotent() {
        let once = substitute("{empresa} {outro}", &vars());
        assert_eq!(substitute(&once, &vars()), once);
    }

    #[test]
    fn test_values_not_reexpanded() {
        let vars = vec![Variable::new("a", "{b}"), Variable::new("b", "x")];
        assert_eq!(substitute("{a}", &vars), "{b}");
    }

    #[test]
    fn test_special_characters_in_key_and_value() {
        let vars = vec![Variable::new("preço.total", "$1 (R$)")];
        assert_eq!(substitute("Total: {preço.total}", &vars), "Total: $1 (R$)");
    }

    #[test]
    fn test_no_variables() {
        assert_eq!(substitute("{empresa}", &[]), "{empresa}");
    }
}
