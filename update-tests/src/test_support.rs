//! Test-only helpers for laying out a repository with update targets.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::TempDir;
use walkdir::WalkDir;

const S2I_FEATURE_CONTENTS: &str = r#"@quay.io/kiegroup/kogito-s2i-builder
Feature: kogito-s2i-builder image tests

  Scenario: Verify if the s2i build is finished as expected with debug enabled
    Given s2i build https://github.com/kiegroup/kogito-examples.git from kogito-quarkus-examples/rules-quarkus-helloworld using nightly-main and runtime-image quay.io/kiegroup/kogito-runtime-jvm:latest
      | variable       | value          |
      | KOGITO_VERSION | 2.0.0-SNAPSHOT |
      | SCRIPT_DEBUG   | true           |
    Then s2i build log should contain Build succeeded

  Scenario: Verify that the native build produces a runner binary
    Given s2i build https://github.com/kiegroup/kogito-examples.git from kogito-quarkus-examples/rules-quarkus-helloworld using nightly-main and runtime-image quay.io/kiegroup/kogito-runtime-native:latest
      | variable | value |
      | NATIVE   | true  |
    Then file /home/kogito/bin/rules-quarkus-helloworld-runner should exist

  Scenario: Verify that the product native runtime image runs the decision service
    Given s2i build https://github.com/kiegroup/kogito-examples.git from kogito-quarkus-examples/decision-tables-quarkus using nightly-main and runtime-image rhpam-7/rhpam-kogito-runtime-native-rhel8:latest
    Then container log should contain Installed features
"#;

const ARCHETYPE_FEATURE_CONTENTS: &str = r#"@quay.io/kiegroup/kogito-s2i-builder
Feature: Quarkus project generation

  Scenario: Generate a project from the quarkus plugin
    When container is started with env
      | variable     | value |
      | SCRIPT_DEBUG | false |
    Then run sh -c "mvn -B io.quarkus:quarkus-maven-plugin:2.0.0.Final:create -DprojectGroupId=org.acme -DprojectArtifactId=demo" in container and check its output for BUILD SUCCESS
"#;

const SETUP_MAVEN_CONTENTS: &str = r#"#!/bin/bash
set -e

MAVEN_SETTINGS_PATH=${1:-$HOME/.m2/settings.xml}

# export MAVEN_REPO_URL=https://repository.example.com/maven2
export JBOSS_MAVEN_REPO_URL=https://repository.jboss.org/nexus/content/groups/public/
# export MAVEN_IGNORE_SELF_SIGNED_CERTIFICATE=true

source "$(dirname "$0")"/configure-maven.sh "$MAVEN_SETTINGS_PATH"
"#;

const CLONE_REPO_CONTENTS: &str = r#"#!/bin/bash
set -e

cd "$(dirname "$0")"
rm -rf kogito-examples
git clone https://github.com/kiegroup/kogito-examples.git
cd kogito-examples
git fetch origin
git checkout nightly-main
"#;

/// Temporary repository seeded with feature files and scripts.
pub struct FixtureRepo {
    dir: TempDir,
}

impl FixtureRepo {
    pub const S2I_FEATURE: &'static str = "tests/features/kogito-s2i-builder.feature";
    pub const ARCHETYPE_FEATURE: &'static str = "tests/features/common/quarkus-plugin.feature";
    pub const SETUP_MAVEN: &'static str = "scripts/setup-maven.sh";
    pub const CLONE_REPO: &'static str = "tests/test-apps/clone-repo.sh";

    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create fixture tempdir")?;
        let repo = Self { dir };
        repo.write(Self::S2I_FEATURE, S2I_FEATURE_CONTENTS)?;
        repo.write(Self::ARCHETYPE_FEATURE, ARCHETYPE_FEATURE_CONTENTS)?;
        repo.write(Self::SETUP_MAVEN, SETUP_MAVEN_CONTENTS)?;
        repo.write(Self::CLONE_REPO, CLONE_REPO_CONTENTS)?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to a repository-relative path, creating parents.
    pub fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path().join(relative);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// Contents of every file in the repository keyed by relative path.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();
        for entry in WalkDir::new(self.path()) {
            let entry = entry.context("walk fixture")?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(self.path())
                .context("strip fixture prefix")?
                .to_string_lossy()
                .replace('\\', "/");
            let contents = fs::read_to_string(entry.path())
                .with_context(|| format!("read {}", entry.path().display()))?;
            files.insert(relative, contents);
        }
        Ok(files)
    }
}
