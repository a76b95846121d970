//! Text rewrites for each update target.
//!
//! Every function is pure: it takes the current document and returns the
//! rewritten document plus the number of sites it matched. Patterns are
//! written to recognize their own output so rerunning with the same value
//! matches again and leaves the text unchanged.

use std::sync::LazyLock;

use regex::Regex;

use super::substitution::{Rewrite, group, rewrite};

static S2I_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>s2i build[ \t]+)(?:(?:https?|ssh|git)://|git@)[^\s"]+"#)
        .expect("valid s2i uri regex")
});

static S2I_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>s2i build[ \t]+\S+[ \t]+from[ \t]+\S+[ \t]+using[ \t]+)[^\s"]+"#)
        .expect("valid s2i ref regex")
});

static GIT_CLONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<indent>[ \t]*)git[ \t]+clone\b[^\r\n]*").expect("valid clone regex")
});

static GIT_CHECKOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<indent>[ \t]*)git[ \t]+checkout\b[^\r\n]*")
        .expect("valid checkout regex")
});

static RUNTIME_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>runtime-image[ \t]+)(?P<image>[^\s"]+)"#)
        .expect("valid runtime image regex")
});

static ARCHETYPE_CREATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<head>\bmvn\b[^"\n]*?)(?:[ \t]+-DarchetypeRepository=\S+)?(?P<plugin>[ \t]+\S*quarkus-maven-plugin\S*:create)"#,
    )
    .expect("valid archetype regex")
});

/// Point `s2i build <uri>` steps at another remote examples repository.
///
/// Local paths (`s2i build /tmp/...`) are not remote URIs and stay as they are.
pub fn set_examples_uri(text: &str, uri: &str) -> Rewrite {
    rewrite(text, &S2I_URI, |caps| {
        Some(format!("{}{uri}", group(caps, "head")))
    })
}

/// Set the ref of `s2i build <uri> from <dir> using <ref>` steps.
pub fn set_examples_ref(text: &str, reference: &str) -> Rewrite {
    rewrite(text, &S2I_REF, |caps| {
        Some(format!("{}{reference}", group(caps, "head")))
    })
}

/// Replace the `git clone` line of a shell script.
pub fn set_clone_uri(text: &str, uri: &str) -> Rewrite {
    rewrite(text, &GIT_CLONE, |caps| {
        Some(format!("{}git clone {uri}", group(caps, "indent")))
    })
}

/// Replace the `git checkout` line of a shell script with a tracking branch
/// for `reference`.
pub fn set_checkout_ref(text: &str, reference: &str) -> Rewrite {
    rewrite(text, &GIT_CHECKOUT, |caps| {
        Some(format!(
            "{}git checkout -b {reference} origin/{reference}",
            group(caps, "indent")
        ))
    })
}

/// Set the value of every `| key | ... |` table row.
pub fn set_table_value(text: &str, key: &str, value: &str) -> Rewrite {
    let pattern = Regex::new(&format!(
        r"(?m)^(?P<indent>[ \t]*)\|[ \t]*{}[ \t]*\|[^|\r\n]*\|",
        regex::escape(key)
    ))
    .expect("escaped key forms a valid regex");
    rewrite(text, &pattern, |caps| {
        Some(format!("{}| {key} | {value} |", group(caps, "indent")))
    })
}

/// Turn `export VAR=...` lines, commented out or not, into an active
/// `export VAR=<value>`.
pub fn set_export(text: &str, variable: &str, value: &str) -> Rewrite {
    let pattern = Regex::new(&format!(
        r"(?m)^(?P<indent>[ \t]*)#?[ \t]*export[ \t]+{}=[^\r\n]*",
        regex::escape(variable)
    ))
    .expect("escaped variable forms a valid regex");
    rewrite(text, &pattern, |caps| {
        Some(format!("{}export {variable}={value}", group(caps, "indent")))
    })
}

/// Swap `runtime-image <name>` references whose name is one of `defaults`
/// (or already `image`) for `image`.
pub fn set_runtime_image(text: &str, defaults: &[String], image: &str) -> Rewrite {
    rewrite(text, &RUNTIME_IMAGE, |caps| {
        let current = group(caps, "image");
        (current == image || defaults.iter().any(|d| d == current))
            .then(|| format!("{}{image}", group(caps, "head")))
    })
}

/// Set `-DarchetypeRepository=<url>` on `mvn ... quarkus-maven-plugin:...:create`
/// commands, right before the plugin goal.
pub fn set_archetype_mirror(text: &str, url: &str) -> Rewrite {
    rewrite(text, &ARCHETYPE_CREATE, |caps| {
        Some(format!(
            "{} -DarchetypeRepository={url}{}",
            group(caps, "head"),
            group(caps, "plugin")
        ))
    })
}
