use uuid::Uuid;

/// Environment-driven startup configuration (SPEC_FULL "Ambient stack").
/// `KUBECONFIG`/in-cluster config is resolved by `kube::Client::try_default`
/// itself, same as the teacher's `operator::initialize_kube_client`.
pub struct Config {
    pub rabbitmq_url: String,
    pub cluster_id: Uuid,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let rabbitmq_url = std::env::var("RABBITMQ_URL")?;
        let cluster_id = std::env::var("CLUSTER_ID")?.parse()?;
        Ok(Config { rabbitmq_url, cluster_id })
    }
}
