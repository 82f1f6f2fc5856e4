use super::*;

#[get("/server/version")]
pub fn get_version(version: &State<Version>) -> &'static str {
    version.0
}

#[get("/categories")]
pub fn get_categories() -> Json<Vec<json::CategoryInfo>> {
    Json(Category::all().map(Into::into).collect())
}
