pub async fn handle(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    crate::app::serve(host, port).await
}
