use cucumber::World;
use cucumber_tests::features::FestboardWorld;

#[tokio::main]
async fn main() {
    FestboardWorld::cucumber().run_and_exit("features/auth/").await;
}
