use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	jc_api::run(jc_api::Args::parse()).await
}
