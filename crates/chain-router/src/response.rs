//! Response side of an exchange.

/// What the router needs from a response: whether the exchange is concluded.
pub trait RouteResponse {
    /// Returns true once the response has been finished by some handler.
    ///
    /// Checked before every chain step; a finished response causes the
    /// remaining entries to be skipped.
    fn is_finished(&self) -> bool;
}

/// A minimal HTTP-like response.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
    /// Whether the exchange is concluded.
    pub finished: bool,
}

impl Response {
    /// Creates a new response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            finished: false,
        }
    }

    /// Creates a 200 OK response.
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::new(404).body("Not Found")
    }

    /// Creates a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        Self::new(405).body("Method Not Allowed")
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_server_error() -> Self {
        Self::new(500).body("Internal Server Error")
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Writes `body` with `status` and marks the exchange as finished.
    pub fn send(&mut self, status: u16, body: impl Into<Vec<u8>>) {
        self.status = status;
        self.body = body.into();
        self.end();
    }

    /// Marks the exchange as finished.
    pub fn end(&mut self) {
        self.finished = true;
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

impl RouteResponse for Response {
    fn is_finished(&self) -> bool {
        self.finished
    }
}
