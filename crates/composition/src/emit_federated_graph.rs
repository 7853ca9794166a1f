use crate::{CompositionConfig, OutputOrdering};
use supergraph::{self as federated, FederatedGraph, SubgraphId};

/// Apply the output ordering to the merged graph. This can't fail: the graph is complete and
/// consistent once composition produced no errors.
pub(crate) fn emit_federated_graph(mut graph: FederatedGraph, config: &CompositionConfig) -> FederatedGraph {
    match config.output_ordering {
        OutputOrdering::FirstSeen => (),
        OutputOrdering::Lexical => sort_lexically(&mut graph),
    }

    tracing::debug!(
        subgraphs = graph.subgraphs.len(),
        types = graph.types.len(),
        ordering = ?config.output_ordering,
        "emitted federated graph"
    );

    graph
}

fn sort_lexically(graph: &mut FederatedGraph) {
    let mut order: Vec<usize> = (0..graph.subgraphs.len()).collect();
    order.sort_by(|a, b| graph.subgraphs[*a].name.cmp(&graph.subgraphs[*b].name));

    // Old subgraph index -> new subgraph id.
    let mut remap = vec![SubgraphId::from(0); order.len()];
    for (new_idx, old_idx) in order.iter().enumerate() {
        remap[*old_idx] = SubgraphId::from(new_idx);
    }

    graph.subgraphs = order.iter().map(|idx| graph.subgraphs[*idx].clone()).collect();

    let ctx = Remap(&remap);

    for definition in graph.types.values_mut() {
        for join_type in &mut definition.join_types {
            join_type.subgraph_id = ctx.id(join_type.subgraph_id);
        }
        definition
            .join_types
            .sort_by(|a, b| (a.subgraph_id, &a.key).cmp(&(b.subgraph_id, &b.key)));

        match &mut definition.kind {
            federated::TypeKind::Object(composite) | federated::TypeKind::Interface(composite) => {
                sort_composite(composite, ctx)
            }
            federated::TypeKind::Union(union) => {
                for subgraph_ids in union.members.values_mut() {
                    ctx.ids(subgraph_ids);
                }
                union.members.sort_keys();
            }
            federated::TypeKind::InputObject(input_object) => {
                for field in input_object.fields.values_mut() {
                    ctx.ids(&mut field.subgraph_ids);
                }
                input_object.fields.sort_keys();
            }
            federated::TypeKind::Enum(r#enum) => {
                for value in r#enum.values.values_mut() {
                    ctx.ids(&mut value.subgraph_ids);
                }
                r#enum.values.sort_keys();
            }
            federated::TypeKind::Scalar => (),
        }
    }

    graph.types.sort_keys();
}

fn sort_composite(composite: &mut federated::Composite, ctx: Remap<'_>) {
    composite.implements_interfaces.sort();

    for join_implements in &mut composite.join_implements {
        join_implements.subgraph_id = ctx.id(join_implements.subgraph_id);
    }
    composite.join_implements.sort();

    for field in composite.fields.values_mut() {
        for join_field in &mut field.join_fields {
            join_field.subgraph_id = ctx.id(join_field.subgraph_id);
        }
        field.join_fields.sort_by_key(|join_field| join_field.subgraph_id);

        for argument in field.arguments.values_mut() {
            ctx.ids(&mut argument.subgraph_ids);
        }
    }

    composite.fields.sort_keys();
}

#[derive(Clone, Copy)]
struct Remap<'a>(&'a [SubgraphId]);

impl Remap<'_> {
    fn id(self, id: SubgraphId) -> SubgraphId {
        self.0.get(usize::from(id)).copied().unwrap_or(id)
    }

    fn ids(self, ids: &mut [SubgraphId]) {
        for id in ids.iter_mut() {
            *id = self.id(*id);
        }
        ids.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> FederatedGraph {
        let mut graph = FederatedGraph {
            subgraphs: ["zeta", "alpha"]
                .into_iter()
                .map(|name| federated::Subgraph {
                    name: name.to_owned(),
                    url: None,
                })
                .collect(),
            ..Default::default()
        };

        let mut r#enum = federated::Enum::default();
        for name in ["B", "A"] {
            r#enum.values.insert(
                name.to_owned(),
                federated::EnumValue {
                    name: name.to_owned(),
                    description: None,
                    directives: Default::default(),
                    subgraph_ids: vec![SubgraphId::from(0), SubgraphId::from(1)],
                },
            );
        }

        for name in ["Zoo", "Animal"] {
            let kind = if name == "Animal" {
                federated::TypeKind::Enum(r#enum.clone())
            } else {
                federated::TypeKind::Scalar
            };
            let mut definition = federated::TypeDefinition::new(name.to_owned(), kind);
            definition.join_types = [0, 1]
                .into_iter()
                .map(|idx| federated::JoinType {
                    subgraph_id: SubgraphId::from(idx),
                    key: None,
                    resolvable: true,
                    extension: false,
                    is_interface_object: false,
                })
                .collect();
            graph.types.insert(name.to_owned(), definition);
        }

        graph
    }

    #[test]
    fn first_seen_keeps_the_graph() {
        let config = CompositionConfig {
            output_ordering: OutputOrdering::FirstSeen,
            ..Default::default()
        };
        let graph = emit_federated_graph(graph(), &config);

        assert_eq!(graph.subgraphs[0].name, "zeta");
        assert_eq!(graph.types.keys().collect::<Vec<_>>(), ["Zoo", "Animal"]);
    }

    #[test]
    fn lexical_ordering_remaps_subgraphs() {
        let graph = emit_federated_graph(graph(), &CompositionConfig::default());

        assert_eq!(graph.subgraphs[0].name, "alpha");
        assert_eq!(graph.types.keys().collect::<Vec<_>>(), ["Animal", "Zoo"]);

        let animal = &graph.types["Animal"];
        let federated::TypeKind::Enum(r#enum) = &animal.kind else {
            unreachable!("Animal is an enum");
        };

        assert_eq!(r#enum.values.keys().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(r#enum.values["A"].subgraph_ids, [SubgraphId::from(0), SubgraphId::from(1)]);

        // "zeta" was ingested first, it is now the second subgraph.
        let join_graphs: Vec<usize> = animal.join_types.iter().map(|join| usize::from(join.subgraph_id)).collect();
        assert_eq!(join_graphs, [0, 1]);
    }
}
