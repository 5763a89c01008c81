pub const ADMIN_TOKEN: &str = "admin-token";
pub const ADMIN_UID: &str = "admin-uid";
pub const EDITOR_TOKEN: &str = "editor-token";
pub const EDITOR_UID: &str = "editor-uid";
pub const EDITOR_EMAIL: &str = "editor@example.com";
pub const OTHER_EDITOR_TOKEN: &str = "other-editor-token";
pub const OTHER_EDITOR_UID: &str = "other-editor-uid";
pub const VISITOR_TOKEN: &str = "visitor-token";
pub const VISITOR_UID: &str = "visitor-uid";
pub const VISITOR_EMAIL: &str = "visitor@example.com";

pub const TEST_SETTINGS: &str = r"
api:
  host: 127.0.0.1
  port: 0
  allowed_origins: ''
  max_upload_bytes: 1048576
firebase:
  project_id: sunian-test
cloudinary:
  cloud_name: test-cloud
  api_key: test-key
  api_secret: test-secret
  upload_root: test-photos
store:
  backend: memory
";
