//! Common test fixtures
//!
//! Reusable snippets for field and method resolution

/// Java class mixing compile-time constants, derived constants and
/// mutable state
pub const JAVA_LIMITS: &str = r#"
class Limits {
    static final int MAX = 10;
    static final int DOUBLE_MAX = MAX * 2;
    static final long WIDE = MAX;
    static final String PREFIX = "limit-";
    static final String LABEL = PREFIX + MAX;
    int count = 3;
    final int fixed = 4;

    static String name() { return "limits"; }
    int twice(int n) { return n * 2; }
}
"#;

/// Kotlin object with constants and properties
pub const KOTLIN_KEYS: &str = r#"
object Keys {
    const val ID = 7
    val NAME = "key" + ID
    var mutable = 1
    fun size() = 3
    fun describe(): String { return NAME + "/" + size() }
}
"#;

/// Fields whose initializers refer to each other
pub const CYCLIC_FIELDS: &str = r#"
class Cycle {
    static final int A = B + 1;
    static final int B = A + 1;
    static final int C = 5;
}
"#;

/// Append a watch of `expr` to a fixture
pub fn watching(fixture: &str, expr: &str) -> String {
    format!("{}\nfun check() {{ watch({}) }}\n", fixture, expr)
}
