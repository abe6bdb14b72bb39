// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};

use crate::ApiErrorCode;

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}
    })
}

fn movie_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Movie"}}}
    })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": {"application/json": {"schema": {"$ref": format!("#/components/schemas/{schema}")}}}
    })
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let id_param = json!({"name": "id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}});
    let codes: Vec<&str> = ApiErrorCode::ALL.iter().map(|c| c.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "marquee movie API",
        "version": "v1"
      },
      "paths": {
        "/api/movies": {
          "get": {
            "responses": {
              "200": {
                "description": "all movies, newest first",
                "content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Movie"}}}}
              },
              "500": error_response("store unavailable, timed out, or server fault")
            }
          },
          "post": {
            "requestBody": json_body("MovieInput"),
            "responses": {
              "201": movie_response("created movie"),
              "400": error_response("validation failed or malformed body")
            }
          }
        },
        "/api/movies/{id}": {
          "parameters": [id_param.clone()],
          "get": {
            "responses": {
              "200": movie_response("movie with reviews"),
              "404": error_response("movie not found"),
              "500": error_response("malformed id or server fault")
            }
          },
          "put": {
            "requestBody": json_body("MoviePatch"),
            "responses": {
              "200": movie_response("updated movie"),
              "400": error_response("validation failed or malformed id"),
              "404": error_response("movie not found")
            }
          },
          "delete": {
            "responses": {
              "200": {
                "description": "deleted",
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Message"}}}
              },
              "404": error_response("movie not found"),
              "500": error_response("malformed id or server fault")
            }
          }
        },
        "/api/movies/{id}/reviews": {
          "parameters": [id_param],
          "post": {
            "requestBody": json_body("ReviewInput"),
            "responses": {
              "200": movie_response("movie with the review appended"),
              "400": error_response("validation failed or malformed id"),
              "404": error_response("movie not found")
            }
          }
        },
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {"get": {"responses": {"200": {"description": "ready"}, "503": {"description": "store not reachable"}}}}
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "details": {"type": "object"},
              "message": {"type": "string"}
            }
          },
          "ApiErrorCode": {
            "type": "string",
            "enum": codes
          },
          "Message": {
            "type": "object",
            "required": ["message"],
            "properties": {"message": {"type": "string"}}
          },
          "Movie": {
            "type": "object",
            "required": ["_id", "averageRating", "createdAt", "description", "genre", "reviews", "title", "year"],
            "properties": {
              "_id": {"type": "string", "format": "uuid"},
              "averageRating": {"type": "number", "minimum": 0, "maximum": 5},
              "createdAt": {"type": "string", "format": "date-time"},
              "description": {"type": "string"},
              "director": {"type": "string"},
              "genre": {"type": "string"},
              "reviews": {"type": "array", "items": {"$ref": "#/components/schemas/Review"}},
              "title": {"type": "string"},
              "year": {"type": "integer"}
            }
          },
          "MovieInput": {
            "type": "object",
            "required": ["description", "genre", "title", "year"],
            "properties": {
              "description": {"type": "string", "minLength": 1},
              "director": {"type": "string"},
              "genre": {"type": "string", "minLength": 1},
              "title": {"type": "string", "minLength": 1},
              "year": {"type": "integer"}
            }
          },
          "MoviePatch": {
            "type": "object",
            "properties": {
              "description": {"type": "string", "minLength": 1},
              "director": {"type": "string", "nullable": true},
              "genre": {"type": "string", "minLength": 1},
              "title": {"type": "string", "minLength": 1},
              "year": {"type": "integer"}
            }
          },
          "Review": {
            "type": "object",
            "required": ["comment", "createdAt", "rating", "username"],
            "properties": {
              "comment": {"type": "string"},
              "createdAt": {"type": "string", "format": "date-time"},
              "rating": {"type": "integer", "minimum": 1, "maximum": 5},
              "username": {"type": "string"}
            }
          },
          "ReviewInput": {
            "type": "object",
            "required": ["comment", "rating", "username"],
            "properties": {
              "comment": {"type": "string", "minLength": 1},
              "rating": {"type": "integer", "minimum": 1, "maximum": 5},
              "username": {"type": "string", "minLength": 1}
            }
          }
        }
      }
    })
}
