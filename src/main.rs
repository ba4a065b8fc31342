fn main() -> anyhow::Result<()> {
    starscape::launch()
}
