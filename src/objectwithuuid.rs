use uuid::Uuid;

pub trait ObjectWithUUID {
    fn uuid(&self) -> &Uuid;
}

/// Finds the object carrying `id`.
pub fn find_by_uuid<'a, T>(objects: &'a [T], id: &Uuid) -> Option<&'a T>
    where T: ObjectWithUUID {
    objects.iter().find(|o| o.uuid() == id)
}

/// Mutable counterpart of [`find_by_uuid`].
pub fn find_by_uuid_mut<'a, T>(objects: &'a mut [T], id: &Uuid) -> Option<&'a mut T>
    where T: ObjectWithUUID {
    objects.iter_mut().find(|o| o.uuid() == id)
}
