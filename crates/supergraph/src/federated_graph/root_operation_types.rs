#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RootOperationTypes {
    pub query: Option<String>,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

impl RootOperationTypes {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("query", self.query.as_deref()),
            ("mutation", self.mutation.as_deref()),
            ("subscription", self.subscription.as_deref()),
        ]
        .into_iter()
        .filter_map(|(operation, name)| Some((operation, name?)))
    }

    pub fn is_root(&self, type_name: &str) -> bool {
        self.iter().any(|(_, name)| name == type_name)
    }
}
