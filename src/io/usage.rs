//! Usage text printed for malformed invocations.

pub const USAGE: &str = "\
Find documentation for names.
usage:
\tgdoc pkg.name   # \"gdoc io.Writer\"
\tgdoc pkg name   # \"gdoc fmt Printf\"
\tgdoc name       # \"gdoc isupper\" finds unicode.IsUpper
\tgdoc -pkg pkg   # \"gdoc -pkg fmt\"
\tgdoc -r expr    # \"gdoc -r '.*exported'\"
pkg is the last component of any package, e.g. fmt, parser
name is the name of an exported symbol; case is ignored in matches.

The name may also be a regular expression to select which names
to match. In regular expression searches, case is ignored and
the pattern must match the entire name, so \".?print\" will match
Print, Fprint and Sprint but not Fprintf.

Flags
\t-c(onst) -f(unc) -i(nterface) -m(ethod) -s(truct) -t(ype) -v(ar)
restrict hits to declarations of the corresponding kind.
Flags
\t-doc -src -url
restrict printing to the documentation, source path, or godoc URL.
Flag
\t-r
takes a single argument (no package), a name or regular expression
to search for in all packages.
Flag
\t-config file
reads settings from file instead of .gdoc/settings.toml.
";
