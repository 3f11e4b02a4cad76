//! Built-in purity facts about well-known framework operations.
//!
//! Entries are keyed by the normalized `Receiver.Method` form of an
//! invocation and written as textual purity tags; the map is built lazily
//! and deduplicated first-match-wins.

use crate::core::{Method, Purity};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Known operations and their a-priori purity levels.
const RAW_ENTRIES: &[(&str, &str)] = &[
    // Console I/O
    ("Console.Write", "Impure"),
    ("Console.WriteLine", "Impure"),
    ("Console.Read", "Impure"),
    ("Console.ReadLine", "Impure"),
    ("Console.ReadKey", "Impure"),
    ("Console.Error.WriteLine", "Impure"),
    // File system
    ("File.Create", "Impure"),
    ("File.Open", "Impure"),
    ("File.Move", "Impure"),
    ("File.Copy", "Impure"),
    ("File.Delete", "Impure"),
    ("File.Exists", "Impure"),
    ("File.ReadAllText", "Impure"),
    ("File.ReadAllLines", "Impure"),
    ("File.ReadAllBytes", "Impure"),
    ("File.WriteAllText", "Impure"),
    ("File.WriteAllLines", "Impure"),
    ("File.WriteAllBytes", "Impure"),
    ("File.AppendAllText", "Impure"),
    ("Directory.CreateDirectory", "Impure"),
    ("Directory.Move", "Impure"),
    ("Directory.Delete", "Impure"),
    ("Directory.Exists", "Impure"),
    ("Directory.GetFiles", "Impure"),
    // Network
    ("HttpClient.GetAsync", "Impure"),
    ("HttpClient.PostAsync", "Impure"),
    ("HttpClient.PutAsync", "Impure"),
    ("HttpClient.DeleteAsync", "Impure"),
    ("HttpClient.SendAsync", "Impure"),
    ("WebClient.DownloadString", "Impure"),
    ("WebClient.UploadString", "Impure"),
    // Threads and tasks
    ("Thread.Start", "Impure"),
    ("Thread.Abort", "Impure"),
    ("Thread.Join", "Impure"),
    ("Thread.Sleep", "Impure"),
    ("Task.Run", "Impure"),
    ("Task.Delay", "Impure"),
    // Clocks
    ("DateTime.Now", "Impure"),
    ("DateTime.UtcNow", "Impure"),
    ("DateTime.Today", "Impure"),
    ("Stopwatch.StartNew", "Impure"),
    // Environment and process
    ("Environment.GetEnvironmentVariable", "Impure"),
    ("Environment.SetEnvironmentVariable", "Impure"),
    ("Environment.Exit", "Impure"),
    // Randomness
    ("Random.Next", "Impure"),
    ("Random.NextDouble", "Impure"),
    ("Random.NextBytes", "Impure"),
    ("Guid.NewGuid", "Impure"),
    // Resource teardown
    ("Dispose", "Impure"),
    // Deterministic framework helpers
    ("Math.Abs", "Pure"),
    ("Math.Max", "Pure"),
    ("Math.Min", "Pure"),
    ("Math.Sqrt", "Pure"),
    ("Math.Pow", "Pure"),
    ("Math.Floor", "Pure"),
    ("Math.Ceiling", "Pure"),
    ("string.Format", "Pure"),
    ("string.Join", "Pure"),
    ("string.Concat", "Pure"),
];

static TABLE: Lazy<HashMap<&'static str, Purity>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (name, tag) in RAW_ENTRIES {
        let purity = tag
            .parse()
            .expect("malformed purity tag in built-in knowledge table");
        // First match wins when an operation is listed more than once.
        table.entry(*name).or_insert(purity);
    }
    table
});

/// A-priori purity of the given method, if the table knows it.
///
/// External identities are matched exactly on their identifier. Resolved
/// methods are matched two-step: the full display form first, then the
/// `<class>.<name>` form without the return type.
pub fn prior_purity(method: &Method) -> Option<Purity> {
    match method {
        Method::External { identifier } => TABLE.get(identifier.as_str()).copied(),
        Method::Resolved { display, .. } => {
            if let Some(purity) = TABLE.get(display.as_str()) {
                return Some(*purity);
            }
            let qualified = display.split_once(' ').map(|(_, rest)| rest)?;
            TABLE.get(qualified).copied()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn external(identifier: &str) -> Method {
        Method::External {
            identifier: identifier.to_string(),
        }
    }

    #[test]
    fn knows_console_io() {
        assert_eq!(
            prior_purity(&external("Console.WriteLine")),
            Some(Purity::Impure)
        );
        assert_eq!(prior_purity(&external("Console.Read")), Some(Purity::Impure));
    }

    #[test]
    fn knows_pure_framework_helpers() {
        assert_eq!(prior_purity(&external("Math.Abs")), Some(Purity::Pure));
    }

    #[test]
    fn lookup_is_exact_string() {
        assert_eq!(prior_purity(&external("Console.WriteLine2")), None);
        assert_eq!(prior_purity(&external("console.writeline")), None);
    }

    #[test]
    fn misses_return_none() {
        assert_eq!(prior_purity(&external("Unrecognized.call")), None);
    }

    #[test]
    fn resolved_method_matches_without_return_type() {
        use crate::syntax::ast::MethodRef;
        let method = Method::Resolved {
            decl: MethodRef { class: 0, method: 0 },
            display: "void Console.WriteLine".to_string(),
        };
        assert_eq!(prior_purity(&method), Some(Purity::Impure));
    }

    #[test]
    fn resolved_method_with_unknown_name_misses() {
        use crate::syntax::ast::MethodRef;
        let method = Method::Resolved {
            decl: MethodRef { class: 0, method: 0 },
            display: "int C.foo".to_string(),
        };
        assert_eq!(prior_purity(&method), None);
    }
}
