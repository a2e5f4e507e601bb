extern crate rocket;

#[rocket::launch]
fn rocket() -> _ {
    let figment = rocket::Config::figment();

    let store = match inkpost::store::connect(&figment) {
        Ok(store) => store,
        Err(e) => panic!("could not set up the content store: {}", e),
    };

    inkpost::build(figment, store)
}
