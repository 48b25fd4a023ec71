pub mod labels;

use std::collections::{BTreeSet, HashSet};

use crate::error::{Error, Result};
use crate::models::changelog::Category;

pub use labels::LabelPattern;

/// Maps pull requests carrying a label matching `pattern` to `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub pattern: LabelPattern,
    pub category: Category,
}

impl CategoryRule {
    pub fn new(pattern: LabelPattern, category: Category) -> Self {
        Self { pattern, category }
    }

    pub fn matches(&self, labels: &BTreeSet<String>) -> bool {
        self.pattern.matches_any(labels)
    }
}

/// Validated classification setup: the ordered rule list plus the order in
/// which category sections are rendered.
///
/// Rules are evaluated top to bottom and the first rule with a matching label
/// wins. The `Other` category is always part of the order, appended last when
/// the configuration does not place it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTaxonomy {
    order: Vec<Category>,
    rules: Vec<CategoryRule>,
}

impl CategoryTaxonomy {
    pub fn new(order: Vec<Category>, rules: Vec<CategoryRule>) -> Result<Self> {
        if order.is_empty() && !rules.is_empty() {
            return Err(Error::Config(
                "category_order is empty but rules reference categories; list every category in category_order"
                    .to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &order {
            if category.name().trim().is_empty() {
                return Err(Error::Config("Category names must not be empty".to_string()));
            }
            if !seen.insert(category.name().to_lowercase()) {
                return Err(Error::Config(format!(
                    "Category '{}' appears more than once in category_order",
                    category
                )));
            }
        }

        for (index, rule) in rules.iter().enumerate() {
            if !order.contains(&rule.category) {
                return Err(Error::Config(format!(
                    "Rule {} (label '{}') maps to category '{}', which is not in category_order",
                    index + 1,
                    rule.pattern,
                    rule.category
                )));
            }
        }

        let mut order = order;
        if !order.iter().any(Category::is_other) {
            order.push(Category::other());
        }

        Ok(Self { order, rules })
    }

    pub fn order(&self) -> &[Category] {
        &self.order
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Position of `category` in the render order. Unknown categories sort
    /// after every configured one.
    pub fn rank(&self, category: &Category) -> usize {
        rank_in(&self.order, category)
    }
}

pub(crate) fn rank_in(order: &[Category], category: &Category) -> usize {
    order
        .iter()
        .position(|c| c == category)
        .unwrap_or(order.len())
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self {
            order: vec![Category::other()],
            rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(label: &str, category: &str) -> CategoryRule {
        CategoryRule::new(LabelPattern::new(label).unwrap(), Category::new(category))
    }

    #[test]
    fn test_other_is_appended() {
        let taxonomy = CategoryTaxonomy::new(
            vec![Category::new("Features"), Category::new("Fixes")],
            vec![rule("feature", "Features"), rule("bug", "Fixes")],
        )
        .unwrap();

        let names: Vec<_> = taxonomy.order().iter().map(Category::name).collect();
        assert_eq!(names, vec!["Features", "Fixes", "Other"]);
        assert_eq!(taxonomy.rank(&Category::new("Fixes")), 1);
        assert_eq!(taxonomy.rank(&Category::new("Unknown")), 3);
    }

    #[test]
    fn test_explicit_other_position_kept() {
        let taxonomy = CategoryTaxonomy::new(
            vec![Category::other(), Category::new("Features")],
            vec![rule("feature", "Features")],
        )
        .unwrap();
        assert_eq!(taxonomy.order()[0], Category::other());
        assert_eq!(taxonomy.order().len(), 2);
    }

    #[test]
    fn test_rules_without_order_rejected() {
        let err = CategoryTaxonomy::new(Vec::new(), vec![rule("bug", "Fixes")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rule_with_undeclared_category_rejected() {
        let err = CategoryTaxonomy::new(
            vec![Category::new("Features")],
            vec![rule("bug", "Fixes")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("'Fixes'"));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let err = CategoryTaxonomy::new(
            vec![Category::new("Fixes"), Category::new("fixes")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_is_single_other_section() {
        let taxonomy = CategoryTaxonomy::default();
        assert_eq!(taxonomy.order(), &[Category::other()]);
        assert!(taxonomy.rules().is_empty());
    }
}
