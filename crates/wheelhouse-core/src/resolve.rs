use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, trace};
use wheelhouse_schema::{normalize, Dependency, LockedPackage, PYTHON_PSEUDO_DEPENDENCY};

/// Transitive closure of `declared` over the lockfile's depends-on edges.
///
/// Every name is normalized. Declared names the lockfile does not know stay
/// in the result so later hash collection reports them. The result does not
/// depend on the order of `packages`.
pub fn resolve_relevant_dependencies<S: AsRef<str>>(
    declared: impl IntoIterator<Item = S>,
    packages: &[LockedPackage],
) -> BTreeSet<String> {
    let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for pkg in packages {
        edges
            .entry(normalize(&pkg.name))
            .or_default()
            .extend(pkg.dependencies.iter().map(|d| normalize(d)));
    }

    let mut relevant = BTreeSet::new();
    let mut queue = VecDeque::new();
    for name in declared {
        let name = normalize(name.as_ref());
        if name != PYTHON_PSEUDO_DEPENDENCY && relevant.insert(name.clone()) {
            queue.push_back(name);
        }
    }

    while let Some(name) = queue.pop_front() {
        let Some(children) = edges.get(&name) else {
            trace!("{name} has no lockfile entry");
            continue;
        };
        for child in children {
            if child != PYTHON_PSEUDO_DEPENDENCY && relevant.insert(child.clone()) {
                trace!("{name} -> {child}");
                queue.push_back(child.clone());
            }
        }
    }

    debug!(
        "{} relevant dependencies out of {} locked packages",
        relevant.len(),
        packages.len()
    );
    relevant
}

/// `(name, version)` of every locked package in `relevant`, in lockfile order.
pub fn relevant_locked_packages(
    packages: &[LockedPackage],
    relevant: &BTreeSet<String>,
) -> Vec<Dependency> {
    packages
        .iter()
        .filter(|pkg| relevant.contains(pkg.normalized_name().as_str()))
        .map(|pkg| Dependency::new(pkg.name.clone(), pkg.version.clone()))
        .collect()
}

/// Names in `relevant` that have no package in the lockfile, sorted.
pub fn unlocked_dependencies(
    packages: &[LockedPackage],
    relevant: &BTreeSet<String>,
) -> Vec<String> {
    let locked: BTreeSet<String> = packages
        .iter()
        .map(|pkg| pkg.normalized_name().into_inner())
        .collect();
    relevant
        .iter()
        .filter(|name| !locked.contains(*name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, deps: &[&str]) -> LockedPackage {
        LockedPackage {
            name: name.to_owned(),
            version: "1.0".to_owned(),
            dependencies: deps.iter().map(|d| (*d).to_owned()).collect(),
            files: Vec::new(),
        }
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn chain_resolves_to_full_closure() {
        let packages = vec![pkg("c", &[]), pkg("b", &["c"]), pkg("a", &["b"])];
        let relevant = resolve_relevant_dependencies(["a"], &packages);
        assert_eq!(names(&relevant), vec!["a", "b", "c"]);
    }

    #[test]
    fn order_of_lockfile_does_not_matter() {
        let base = vec![
            pkg("a", &["b"]),
            pkg("b", &["c"]),
            pkg("c", &["d"]),
            pkg("d", &[]),
            pkg("dev", &["a"]),
        ];
        let expected = resolve_relevant_dependencies(["a"], &base);
        let orders: [[usize; 5]; 4] = [
            [4, 3, 2, 1, 0],
            [2, 0, 4, 1, 3],
            [3, 1, 0, 4, 2],
            [1, 4, 3, 0, 2],
        ];
        for order in orders {
            let permuted: Vec<LockedPackage> = order.iter().map(|&i| base[i].clone()).collect();
            assert_eq!(resolve_relevant_dependencies(["a"], &permuted), expected);
        }
        assert_eq!(names(&expected), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn dev_only_packages_are_excluded() {
        let packages = vec![
            pkg("cowsay", &[]),
            pkg("pytest", &["iniconfig", "pluggy"]),
            pkg("iniconfig", &[]),
            pkg("pluggy", &[]),
        ];
        let relevant = resolve_relevant_dependencies(["cowsay"], &packages);
        assert_eq!(names(&relevant), vec!["cowsay"]);
    }

    #[test]
    fn names_are_normalized_on_both_sides() {
        let packages = vec![
            pkg("Beautiful_Soup4", &["Soup.Sieve"]),
            pkg("soup-sieve", &[]),
        ];
        let relevant = resolve_relevant_dependencies(["beautiful-soup4"], &packages);
        assert_eq!(names(&relevant), vec!["beautiful-soup4", "soup-sieve"]);
    }

    #[test]
    fn python_is_never_relevant() {
        let packages = vec![pkg("a", &["python"])];
        let relevant = resolve_relevant_dependencies(["python", "a"], &packages);
        assert_eq!(names(&relevant), vec!["a"]);
    }

    #[test]
    fn unknown_declared_names_are_kept() {
        let relevant = resolve_relevant_dependencies(["ghost"], &[]);
        assert_eq!(names(&relevant), vec!["ghost"]);
    }

    #[test]
    fn cycles_terminate() {
        let packages = vec![pkg("a", &["b"]), pkg("b", &["a"])];
        let relevant = resolve_relevant_dependencies(["a"], &packages);
        assert_eq!(names(&relevant), vec!["a", "b"]);
    }

    #[test]
    fn relevant_locked_packages_keep_lockfile_order() {
        let packages = vec![pkg("Zeta", &[]), pkg("dev", &[]), pkg("alpha", &[])];
        let relevant: BTreeSet<String> = ["zeta", "alpha"].iter().map(|s| (*s).to_owned()).collect();
        let deps = relevant_locked_packages(&packages, &relevant);
        assert_eq!(
            deps,
            vec![Dependency::new("Zeta", "1.0"), Dependency::new("alpha", "1.0")]
        );
    }

    #[test]
    fn unlocked_names_are_reported_sorted() {
        let packages = vec![pkg("Cowsay", &[])];
        let relevant: BTreeSet<String> = ["requests", "cowsay", "attrs"]
            .iter()
            .map(|n| (*n).to_owned())
            .collect();
        assert_eq!(
            unlocked_dependencies(&packages, &relevant),
            vec!["attrs", "requests"]
        );
    }
}
