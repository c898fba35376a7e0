//! Cross-codec vCard tests: fixtures parsed, written and read back through
//! every syntax, plus the PREF rewrite rules.

mod pref;
