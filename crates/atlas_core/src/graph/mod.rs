//! Graph projection over repository profiles.
//!
//! # Responsibility
//! - Map the full profile collection onto repo/team/language nodes with
//!   `owns` and `uses` edges.
//!
//! # Invariants
//! - The graph is rebuilt from scratch on every call, never patched.
//! - Nodes and edges are deduplicated by id and sorted by id, so the output
//!   does not depend on profile order.

use crate::model::graph::{AtlasEdge, AtlasGraph, AtlasNode, EdgeKind, NodeKind};
use crate::model::profile::{ProfileOwnership, RepoProfile};
use std::collections::BTreeMap;

/// Projects profiles into an [`AtlasGraph`].
pub fn build_atlas_graph(profiles: &[RepoProfile]) -> AtlasGraph {
    let mut nodes = BTreeMap::<String, AtlasNode>::new();
    let mut edges = BTreeMap::<String, AtlasEdge>::new();

    for profile in profiles {
        let full_name = profile.full_name();
        let repo_id = NodeKind::Repo.node_id(&full_name);
        add_node(&mut nodes, &repo_id, NodeKind::Repo, &full_name);

        for team in &profile.ownership.teams {
            let team_id = NodeKind::Team.node_id(team);
            add_node(&mut nodes, &team_id, NodeKind::Team, team);
            add_edge(&mut edges, &team_id, &repo_id, EdgeKind::Owns);
        }

        for language in &profile.languages {
            let language_id = NodeKind::Language.node_id(language);
            add_node(&mut nodes, &language_id, NodeKind::Language, language);
            add_edge(&mut edges, &language_id, &repo_id, EdgeKind::Uses);
        }
    }

    AtlasGraph {
        nodes: nodes.into_values().collect(),
        edges: edges.into_values().collect(),
    }
}

/// Indexes each profile's ownership by `<owner>/<name>`.
pub fn owner_map(profiles: &[RepoProfile]) -> BTreeMap<String, ProfileOwnership> {
    profiles
        .iter()
        .map(|profile| (profile.full_name(), profile.ownership.clone()))
        .collect()
}

fn add_node(nodes: &mut BTreeMap<String, AtlasNode>, id: &str, kind: NodeKind, label: &str) {
    nodes.entry(id.to_string()).or_insert_with(|| AtlasNode {
        id: id.to_string(),
        kind,
        label: label.to_string(),
    });
}

fn add_edge(edges: &mut BTreeMap<String, AtlasEdge>, source: &str, target: &str, kind: EdgeKind) {
    let id = format!("{source}->{target}");
    edges.entry(id.clone()).or_insert_with(|| AtlasEdge {
        id,
        source: source.to_string(),
        target: target.to_string(),
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::{build_atlas_graph, owner_map};
    use crate::model::graph::{EdgeKind, NodeKind};
    use crate::model::profile::{OwnershipSource, ProfileOwnership, RepoProfile};

    fn profile(name: &str, teams: &[&str], languages: &[&str]) -> RepoProfile {
        RepoProfile {
            owner: "acme".to_string(),
            name: name.to_string(),
            has_readme: true,
            has_codeowners: true,
            ownership: ProfileOwnership {
                teams: teams.iter().map(|t| t.to_string()).collect(),
                users: Vec::new(),
                source: OwnershipSource::Codeowners,
            },
            languages: languages.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn shared_team_yields_one_node_and_one_edge_per_repo() {
        let graph = build_atlas_graph(&[
            profile("api", &["@acme/core"], &[]),
            profile("web", &["@acme/core"], &[]),
        ]);

        assert_eq!(graph.nodes_of_kind(NodeKind::Team).count(), 1);
        assert_eq!(graph.nodes_of_kind(NodeKind::Repo).count(), 2);
        let owns: Vec<_> = graph.edges_of_kind(EdgeKind::Owns).collect();
        assert_eq!(owns.len(), 2);
        assert!(owns
            .iter()
            .any(|edge| edge.id == "team:@acme/core->repo:acme/api"));
        assert!(owns
            .iter()
            .any(|edge| edge.id == "team:@acme/core->repo:acme/web"));
    }

    #[test]
    fn languages_become_uses_edges() {
        let graph = build_atlas_graph(&[profile("api", &[], &["Rust", "Shell"])]);
        let node = graph.node("language:Rust").expect("language node");
        assert_eq!(node.label, "Rust");
        assert_eq!(graph.edges_of_kind(EdgeKind::Uses).count(), 2);
        assert_eq!(graph.node("repo:acme/api").expect("repo node").label, "acme/api");
    }

    #[test]
    fn projection_is_order_insensitive_and_deduplicates_profiles() {
        let a = profile("api", &["@acme/core"], &["Rust"]);
        let b = profile("web", &["@acme/ui", "@acme/core"], &["TypeScript", "Rust"]);
        let forward = build_atlas_graph(&[a.clone(), b.clone()]);
        let backward = build_atlas_graph(&[b, a.clone(), a]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn connected_node_ids_follow_edges_both_ways() {
        let graph = build_atlas_graph(&[
            profile("api", &["@acme/core"], &["Rust"]),
            profile("web", &["@acme/core"], &[]),
        ]);
        let around_team = graph.connected_node_ids("team:@acme/core");
        assert_eq!(around_team.len(), 3);
        assert!(around_team.contains("repo:acme/web"));

        let around_repo = graph.connected_node_ids("repo:acme/api");
        assert!(around_repo.contains("language:Rust"));
        assert!(around_repo.contains("team:@acme/core"));
        assert!(!around_repo.contains("repo:acme/web"));
    }

    #[test]
    fn owner_map_keys_by_full_name() {
        let map = owner_map(&[profile("api", &["@acme/core"], &[])]);
        assert_eq!(map["acme/api"].teams, vec!["@acme/core".to_string()]);
    }
}
