//! Path layer: ordered allow/deny rules checked before routing.
//!
//! Rules are tried top to bottom and the first match decides. A path that no
//! rule matches is denied. Method-level role checks still run afterwards for
//! permitted paths.

/// Ant-style path pattern.
///
/// Only the two shapes the service needs are supported:
/// - `/prefix/**` matches `/prefix` and anything below it
/// - anything else is an exact match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Prefix(String),
    Any,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "/**" || pattern == "**" {
            return Self::Any;
        }
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Prefix(prefix.to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(p) => p == path,
            // `/v1/**` covers `/v1` and `/v1/...` but not `/v10`.
            Self::Prefix(p) => match path.strip_prefix(p.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Permit,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRule {
    pub pattern: PathPattern,
    pub access: Access,
}

impl PathRule {
    /// `Some(decision)` if the rule applies, `None` to defer to the next rule.
    pub fn check(&self, path: &str) -> Option<Decision> {
        if !self.pattern.matches(path) {
            return None;
        }
        Some(match self.access {
            Access::Permit => Decision::Allow,
            Access::Deny => Decision::Deny,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PathPolicy {
    rules: Vec<PathRule>,
}

impl PathPolicy {
    pub fn builder() -> PathPolicyBuilder {
        PathPolicyBuilder::default()
    }

    /// Health/info endpoints, favicon and `/v1/**` are open at this layer;
    /// everything else is denied.
    pub fn default_rules() -> Self {
        Self::builder()
            .permit_all("/actuator/**")
            .permit_all("/favicon.ico")
            .permit_all("/v1/**")
            .deny_all("/**")
            .build()
    }

    pub fn evaluate(&self, path: &str) -> Decision {
        self.rules
            .iter()
            .find_map(|rule| rule.check(path))
            .unwrap_or(Decision::Deny)
    }

    pub fn rules(&self) -> &[PathRule] {
        &self.rules
    }
}

#[derive(Debug, Default)]
pub struct PathPolicyBuilder {
    rules: Vec<PathRule>,
}

impl PathPolicyBuilder {
    pub fn permit_all(self, pattern: &str) -> Self {
        self.rule(pattern, Access::Permit)
    }

    pub fn deny_all(self, pattern: &str) -> Self {
        self.rule(pattern, Access::Deny)
    }

    fn rule(mut self, pattern: &str, access: Access) -> Self {
        self.rules.push(PathRule {
            pattern: PathPattern::parse(pattern),
            access,
        });
        self
    }

    pub fn build(self) -> PathPolicy {
        PathPolicy { rules: self.rules }
    }
}
