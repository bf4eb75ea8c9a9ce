use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	jc_worker::run(jc_worker::Args::parse()).await
}
