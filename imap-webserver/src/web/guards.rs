use imap_core::gateways::image::ImageResolver;

pub struct Version(pub &'static str);

pub struct Images(pub Box<dyn ImageResolver + Send + Sync>);

impl Images {
    pub fn resolver(&self) -> &(dyn ImageResolver + Send + Sync) {
        &*self.0
    }
}
